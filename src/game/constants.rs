//! Fixed rule constants for a wagered cornhole match.

/// Score at or above which a player wins. A throw can land up to 3
/// points, so an unchecked sum could overshoot; threshold-or-above counts.
pub const WIN_THRESHOLD: u8 = 3;

/// Default stake per player, in base ledger units.
pub const DEFAULT_BET_AMOUNT: u64 = 1_000_000;

/// Default number of seconds both players have, from setup, to finish the
/// match before the turn holder forfeits.
pub const DEFAULT_GAME_DURATION_SECS: i64 = 3600;

/// Default bound on the fee a payout leaving the escrow may carry.
pub const DEFAULT_MAX_PAYOUT_FEE: u64 = 1_000;
