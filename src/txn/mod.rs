//! Signed operations and their atomic grouping.

pub mod group;
pub mod ops;

pub use group::{AtomicGroup, GroupContext};
pub use ops::{ActionMove, AppCall, GameOp, MoneyRefund, Operation, Payment, SetupPlayers};
