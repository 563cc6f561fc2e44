//! State machine for a wagered cornhole match.
//!
//! Transitions are pure: every rule takes the current record plus its
//! group context and either returns the complete successor record or a
//! rejection. A rejection carries no side effect at all: the caller's
//! record stays byte-for-byte what it was.

use chrono::{DateTime, Utc};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::WIN_THRESHOLD;
use super::entities::{Address, GameId, GameState, GameStatus, PlayerSide, Score};
use super::timeout;
use crate::escrow::settlement::{self, SettlementError};
use crate::txn::{
    ActionMove, AtomicGroup, GameOp, GroupContext, MoneyRefund, Operation, SetupPlayers,
};

/// Why a submitted group was rejected.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum RejectReason {
    #[error("players already set")]
    AlreadyInitialized,
    #[error("stake payments disagree on receiver, amount, or sender")]
    StakeMismatch,
    #[error("not your turn")]
    NotYourTurn,
    #[error("game already over")]
    GameAlreadyOver,
    #[error("game has not started")]
    GameNotStarted,
    #[error("illegal throw of {0} points")]
    InvalidPoint(Score),
    #[error("the action deadline has passed")]
    DeadlinePassed,
    #[error("no winner yet")]
    NoWinnerYet,
    #[error("invalid payout: {0}")]
    PayoutInvalid(#[from] SettlementError),
    #[error("malformed group: {0}")]
    MalformedGroup(String),
    #[error("no game under id {0}")]
    UnknownGame(GameId),
    #[error("invalid game state: internal consistency error")]
    InternalState,
}

/// Result type for transition rules
pub type TransitionResult<T> = Result<T, RejectReason>;

/// One rule per operation kind: compute the complete successor record,
/// or reject with no effect.
#[enum_dispatch]
pub trait TransitionRule {
    fn apply(
        &self,
        caller: &Address,
        state: &GameState,
        ctx: &GroupContext<'_>,
    ) -> TransitionResult<GameState>;
}

impl TransitionRule for SetupPlayers {
    /// Seats both players from the two stake payments riding alongside:
    /// the first payment's sender becomes X and throws first, the second
    /// becomes O, and their common receiver becomes the escrow.
    fn apply(
        &self,
        _caller: &Address,
        state: &GameState,
        ctx: &GroupContext<'_>,
    ) -> TransitionResult<GameState> {
        match state.status {
            GameStatus::Uninitialized => {}
            GameStatus::InProgress => return Err(RejectReason::AlreadyInitialized),
            GameStatus::XWon | GameStatus::OWon => return Err(RejectReason::GameAlreadyOver),
        }
        if state.player_x.is_some() || state.player_o.is_some() {
            return Err(RejectReason::AlreadyInitialized);
        }

        let payments = ctx.sibling_payments();
        if payments.len() != 2 {
            return Err(RejectReason::StakeMismatch);
        }
        let (stake_x, stake_o) = (payments[0], payments[1]);
        if stake_x.receiver != stake_o.receiver {
            return Err(RejectReason::StakeMismatch);
        }
        if stake_x.amount != state.config.bet_amount || stake_o.amount != state.config.bet_amount {
            return Err(RejectReason::StakeMismatch);
        }
        if stake_x.sender == stake_o.sender {
            return Err(RejectReason::StakeMismatch);
        }

        let mut next = state.clone();
        next.player_x = Some(stake_x.sender.clone());
        next.player_o = Some(stake_o.sender.clone());
        next.turn = Some(stake_x.sender.clone());
        next.escrow = Some(stake_x.receiver.clone());
        next.action_deadline = Some(timeout::action_deadline(
            ctx.now,
            state.config.game_duration_secs,
        ));
        next.status = GameStatus::InProgress;
        Ok(next)
    }
}

impl TransitionRule for ActionMove {
    /// Grants the caller's points and either ends the match or hands the
    /// turn to the other player.
    fn apply(
        &self,
        caller: &Address,
        state: &GameState,
        ctx: &GroupContext<'_>,
    ) -> TransitionResult<GameState> {
        match state.status {
            GameStatus::InProgress => {}
            GameStatus::Uninitialized => return Err(RejectReason::GameNotStarted),
            GameStatus::XWon | GameStatus::OWon => return Err(RejectReason::GameAlreadyOver),
        }
        let deadline = state.action_deadline.ok_or(RejectReason::InternalState)?;
        if timeout::is_expired(ctx.now, deadline) {
            return Err(RejectReason::DeadlinePassed);
        }
        if state.turn.as_ref() != Some(caller) {
            return Err(RejectReason::NotYourTurn);
        }
        if self.point > WIN_THRESHOLD {
            return Err(RejectReason::InvalidPoint(self.point));
        }
        // Status InProgress implies both scores sit below the threshold,
        // but a divergent record must never produce a second winner.
        if state.has_winning_score() {
            return Err(RejectReason::GameAlreadyOver);
        }
        let side = state.side_of(caller).ok_or(RejectReason::NotYourTurn)?;

        let score = (state.score_of(side) + self.point).min(WIN_THRESHOLD);
        let mut next = state.clone();
        match side {
            PlayerSide::X => next.score_x = score,
            PlayerSide::O => next.score_o = score,
        }
        if score >= WIN_THRESHOLD {
            next.status = GameStatus::won_by(side);
        } else {
            let other = state
                .address_of(side.other())
                .ok_or(RejectReason::InternalState)?;
            next.turn = Some(other.clone());
        }
        Ok(next)
    }
}

impl TransitionRule for MoneyRefund {
    /// Determines the winner, by play from `status` or by forfeiture
    /// once the turn holder runs out the clock, then holds the payout
    /// riding alongside to exactly both stakes, escrow to winner.
    ///
    /// `status` is the single source of truth for a win by play; scores
    /// are never re-derived here.
    fn apply(
        &self,
        _caller: &Address,
        state: &GameState,
        ctx: &GroupContext<'_>,
    ) -> TransitionResult<GameState> {
        let winner = match state.status.winner() {
            Some(side) => side,
            None => timeout::timeout_winner(state, ctx.now).ok_or(RejectReason::NoWinnerYet)?,
        };
        let winner_address = state.address_of(winner).ok_or(RejectReason::InternalState)?;
        let escrow = state.escrow.as_ref().ok_or(RejectReason::InternalState)?;

        let payments = ctx.sibling_payments();
        if payments.len() != 1 {
            return Err(RejectReason::MalformedGroup(
                "a refund pairs with exactly one payout".to_string(),
            ));
        }
        settlement::verify_refund_payout(
            payments[0],
            escrow,
            winner_address,
            state.config.payout_amount(),
            state.config.max_payout_fee,
        )?;

        // Idempotent when the status was already terminal for this side.
        let mut next = state.clone();
        next.status = GameStatus::won_by(winner);
        Ok(next)
    }
}

/// Validate a single operation from a group against the current record.
///
/// Payments from the escrow pass settlement structure checks on their
/// own, independent of whatever call cites them; every other payment
/// takes its meaning from the call in its group and passes through
/// unchanged.
pub fn apply_operation(
    state: &GameState,
    operation: &Operation,
    ctx: &GroupContext<'_>,
) -> TransitionResult<GameState> {
    match operation {
        Operation::AppCall(call) => call.op.apply(&call.sender, state, ctx),
        Operation::Payment(payment) => {
            if let Some(escrow) = state.escrow.as_ref() {
                if payment.sender == *escrow {
                    settlement::verify_payout_structure(
                        payment,
                        escrow,
                        state.config.max_payout_fee,
                    )?;
                }
            }
            Ok(state.clone())
        }
    }
}

/// Structural check on a group before any rule runs: exactly one game
/// call, first in the group, sized for its operation kind.
fn check_group_shape(group: &AtomicGroup) -> TransitionResult<()> {
    let calls = group.app_calls();
    if calls.len() != 1 {
        return Err(RejectReason::MalformedGroup(
            "exactly one game call per group".to_string(),
        ));
    }
    if group.ops().first().and_then(Operation::as_app_call).is_none() {
        return Err(RejectReason::MalformedGroup(
            "the game call must lead the group".to_string(),
        ));
    }
    let expected = match calls[0].op {
        GameOp::SetupPlayers(_) => 3,
        GameOp::ActionMove(_) => 1,
        GameOp::MoneyRefund(_) => 2,
    };
    if group.len() != expected {
        return Err(RejectReason::MalformedGroup(format!(
            "{} takes a group of {expected} operations",
            calls[0].op
        )));
    }
    Ok(())
}

/// Thread a whole group through the rules: compute the complete
/// successor record, or reject with the record untouched.
///
/// All or nothing: the successor exists only if every operation in the
/// group passes. Callers commit the returned record whole.
pub fn apply_group(
    state: &GameState,
    group: &AtomicGroup,
    now: DateTime<Utc>,
) -> TransitionResult<GameState> {
    check_group_shape(group)?;
    let mut next = state.clone();
    for (index, operation) in group.ops().iter().enumerate() {
        let ctx = GroupContext::new(group, index, now);
        next = apply_operation(&next, operation, &ctx)?;
    }
    Ok(next)
}
