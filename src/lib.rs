//! # Cornhole Engine
//!
//! Authoritative rules for a two-party, wager-settled cornhole match.
//!
//! Both players stake the same bet into an escrow account, trade throws
//! until one of them reaches the winning score, and the escrow releases
//! both stakes to the winner. Every mutation arrives as an atomic group
//! of operations and is validated by a pure transition function: the
//! whole group commits, or none of it does.
//!
//! ## Operations
//!
//! - **SetupPlayers**: the call plus both stake payments. Seats the
//!   players, records the escrow, starts the clock.
//! - **ActionMove**: a single throw by the turn holder, worth 0 to 3
//!   points. First score at or above the threshold wins.
//! - **MoneyRefund**: the call plus the payout. Settles both stakes to
//!   the winner, by play or by forfeiture once the turn holder runs
//!   out the clock.
//!
//! ## Core Modules
//!
//! - [`game`]: entities, transition rules, and timeout policy
//! - [`txn`]: operations and their atomic grouping
//! - [`escrow`]: structural settlement checks on payouts
//! - [`store`]: durable records, the submit driver, and the snapshot
//!   codec
//!
//! ## Example
//!
//! ```
//! use cornhole_engine::{GameConfig, StateStore};
//!
//! // Create a fresh match record waiting for both stakes.
//! let mut store = StateStore::new();
//! let game_id = store.create(GameConfig::default());
//! assert!(store.view(game_id).is_some());
//! ```

/// Escrow settlement checks for payouts leaving the stake account.
pub mod escrow;
pub use escrow::{SettlementError, SettlementResult};

/// Match engine core: entities, transition rules, and timeout policy.
pub mod game;
pub use game::{
    Address, GameConfig, GameState, GameStatus, GameView, PlayerSide, RejectReason,
    TransitionResult, TransitionRule, apply_group, apply_operation,
    constants::{
        self, DEFAULT_BET_AMOUNT, DEFAULT_GAME_DURATION_SECS, DEFAULT_MAX_PAYOUT_FEE,
        WIN_THRESHOLD,
    },
    entities::{Credits, GameId, Score},
    timeout,
};

/// Durable match records and the submission driver.
pub mod store;
pub use store::{StateStore, snapshot};

/// Signed operations and their atomic grouping.
pub mod txn;
pub use txn::{
    ActionMove, AppCall, AtomicGroup, GameOp, GroupContext, MoneyRefund, Operation, Payment,
    SetupPlayers,
};
