//! Deadline arithmetic and forfeiture evaluation.
//!
//! The boundary instant is not expiry: a deadline of T means throws are
//! legal through T, and forfeiture starts strictly after it.

use chrono::{DateTime, Duration, Utc};

use super::entities::{GameState, GameStatus, PlayerSide};

/// Deadline for a match set up at `setup_time`.
///
/// Saturates at the far end of the calendar instead of overflowing.
#[must_use]
pub fn action_deadline(setup_time: DateTime<Utc>, duration_secs: i64) -> DateTime<Utc> {
    Duration::try_seconds(duration_secs)
        .and_then(|duration| setup_time.checked_add_signed(duration))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whether `now` sits strictly past the deadline.
#[must_use]
pub fn is_expired(now: DateTime<Utc>, deadline: DateTime<Utc>) -> bool {
    now > deadline
}

/// The player who forfeits if the clock runs out: whoever holds the turn.
#[must_use]
pub fn forfeiting_player(state: &GameState) -> Option<PlayerSide> {
    state.turn_side()
}

/// Winner by forfeiture, if any: the non-turn player, once an in-progress
/// match runs past its deadline.
#[must_use]
pub fn timeout_winner(state: &GameState, now: DateTime<Utc>) -> Option<PlayerSide> {
    if state.status != GameStatus::InProgress {
        return None;
    }
    let deadline = state.action_deadline?;
    if !is_expired(now, deadline) {
        return None;
    }
    forfeiting_player(state).map(PlayerSide::other)
}
