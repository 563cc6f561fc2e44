//! Structural checks on payouts leaving the escrow.
//!
//! These run independently of game-score logic. They exist to stop an
//! unrelated fund movement from riding along with a legitimate refund
//! inside the same atomic group: a payout must come from the escrow,
//! carry a bounded fee, and leave the escrow's remaining balance and
//! signing authority alone.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::entities::{Address, Credits};
use crate::txn::Payment;

/// Ways a payout can fail settlement checks.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum SettlementError {
    #[error("payout does not come from the escrow")]
    NotFromEscrow,
    #[error("payout fee {fee} exceeds the {max} bound")]
    FeeTooHigh { fee: Credits, max: Credits },
    #[error("payout closes the escrow remainder out to another account")]
    RemainderRedirected,
    #[error("payout reassigns the escrow's signing authority")]
    AuthorityReassigned,
    #[error("payout receiver is not the winner")]
    WrongReceiver,
    #[error("payout of {got} does not match the {expected} owed")]
    WrongAmount { got: Credits, expected: Credits },
}

/// Result type for settlement checks
pub type SettlementResult<T> = Result<T, SettlementError>;

/// Check everything about a payout that does not depend on who won:
/// origin, fee bound, and the two side channels.
pub fn verify_payout_structure(
    payout: &Payment,
    escrow: &Address,
    max_fee: Credits,
) -> SettlementResult<()> {
    if payout.sender != *escrow {
        return Err(SettlementError::NotFromEscrow);
    }
    if payout.fee > max_fee {
        return Err(SettlementError::FeeTooHigh {
            fee: payout.fee,
            max: max_fee,
        });
    }
    if payout.close_remainder_to.is_some() {
        return Err(SettlementError::RemainderRedirected);
    }
    if payout.rekey_to.is_some() {
        return Err(SettlementError::AuthorityReassigned);
    }
    Ok(())
}

/// Check a payout against the determined winner: structure first, then
/// the receiver and the exact both-stakes amount.
pub fn verify_refund_payout(
    payout: &Payment,
    escrow: &Address,
    winner: &Address,
    expected: Credits,
    max_fee: Credits,
) -> SettlementResult<()> {
    verify_payout_structure(payout, escrow, max_fee)?;
    if payout.receiver != *winner {
        return Err(SettlementError::WrongReceiver);
    }
    if payout.amount != expected {
        return Err(SettlementError::WrongAmount {
            got: payout.amount,
            expected,
        });
    }
    Ok(())
}
