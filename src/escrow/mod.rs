//! Escrow settlement checks for payouts leaving the stake account.

pub mod settlement;

pub use settlement::{
    SettlementError, SettlementResult, verify_payout_structure, verify_refund_payout,
};
