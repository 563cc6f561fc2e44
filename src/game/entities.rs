//! Entities for a wagered cornhole match: identities, money, scores,
//! configuration, and the durable match record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use super::constants::{
    DEFAULT_BET_AMOUNT, DEFAULT_GAME_DURATION_SECS, DEFAULT_MAX_PAYOUT_FEE, WIN_THRESHOLD,
};

/// Type alias for stake and payout amounts in base ledger units.
///
/// A full settlement moves exactly twice the bet, so a valid stake
/// never claims more than half the credit range.
pub type Credits = u64;

/// Type alias for match scores. Stored values never exceed
/// [`WIN_THRESHOLD`](super::constants::WIN_THRESHOLD).
pub type Score = u8;

/// Unique identifier for one match record.
pub type GameId = Uuid;

/// An opaque identity handle: a player account or the escrow account.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Address(String);

impl Address {
    pub fn new(s: &str) -> Self {
        // Handles are opaque to the engine; just strip copy/paste fuzz.
        Self(s.trim().to_string())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// The two player slots. X stakes first and throws first.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PlayerSide {
    X,
    O,
}

impl PlayerSide {
    /// The opposing slot.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for PlayerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::X => "X",
            Self::O => "O",
        };
        write!(f, "{repr}")
    }
}

/// Match lifecycle status. Terminal values are permanent.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Waiting for both stakes to land.
    Uninitialized,
    /// Both players staked; throws are being exchanged.
    InProgress,
    /// X reached the winning score, or O forfeited on time.
    XWon,
    /// O reached the winning score, or X forfeited on time.
    OWon,
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::XWon | Self::OWon)
    }

    /// The winning side, if the match has one.
    #[must_use]
    pub const fn winner(self) -> Option<PlayerSide> {
        match self {
            Self::XWon => Some(PlayerSide::X),
            Self::OWon => Some(PlayerSide::O),
            Self::Uninitialized | Self::InProgress => None,
        }
    }

    /// Terminal status for a winning side.
    #[must_use]
    pub const fn won_by(side: PlayerSide) -> Self {
        match side {
            PlayerSide::X => Self::XWon,
            PlayerSide::O => Self::OWon,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Uninitialized => "uninitialized",
            Self::InProgress => "in progress",
            Self::XWon => "X won",
            Self::OWon => "O won",
        };
        write!(f, "{repr}")
    }
}

/// Fixed match parameters. Set when the record is created, immutable
/// afterward.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameConfig {
    /// Stake each player pays into escrow, in base ledger units.
    pub bet_amount: Credits,
    /// Seconds both players have, from setup, to finish the match.
    pub game_duration_secs: i64,
    /// Largest fee a payout leaving the escrow may carry.
    pub max_payout_fee: Credits,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_BET_AMOUNT,
            DEFAULT_GAME_DURATION_SECS,
            DEFAULT_MAX_PAYOUT_FEE,
        )
    }
}

impl GameConfig {
    #[must_use]
    pub const fn new(bet_amount: Credits, game_duration_secs: i64, max_payout_fee: Credits) -> Self {
        Self {
            bet_amount,
            game_duration_secs,
            max_payout_fee,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.bet_amount == 0 {
            return Err("Bet amount must be positive".to_string());
        }

        if self.bet_amount > Credits::MAX / 2 {
            return Err("Bet amount must not exceed half the credit range".to_string());
        }

        if self.game_duration_secs <= 0 {
            return Err("Game duration must be positive".to_string());
        }

        if self.max_payout_fee == 0 {
            return Err("Payout fee bound must be positive".to_string());
        }

        Ok(())
    }

    /// Total the escrow releases to the winner: both stakes.
    ///
    /// Saturates rather than wrapping for bets past the `validate` bound.
    #[must_use]
    pub const fn payout_amount(&self) -> Credits {
        self.bet_amount.saturating_mul(2)
    }
}

/// The durable match record. One per game instance; replaced whole on
/// every accepted transition, never mutated field by field.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameState {
    pub player_x: Option<Address>,
    pub player_o: Option<Address>,
    /// Identity authorized to submit the next throw.
    pub turn: Option<Address>,
    /// Identity holding both stakes until settlement.
    pub escrow: Option<Address>,
    /// Fixed at setup; the turn holder forfeits strictly after it.
    pub action_deadline: Option<DateTime<Utc>>,
    pub score_x: Score,
    pub score_o: Score,
    pub status: GameStatus,
    pub config: GameConfig,
}

impl Default for GameState {
    fn default() -> Self {
        GameConfig::default().into()
    }
}

impl GameState {
    /// Fresh Uninitialized record with zeroed scores.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        config.into()
    }

    /// Which slot an identity occupies, if any.
    #[must_use]
    pub fn side_of(&self, address: &Address) -> Option<PlayerSide> {
        match (self.player_x.as_ref(), self.player_o.as_ref()) {
            (Some(x), _) if x == address => Some(PlayerSide::X),
            (_, Some(o)) if o == address => Some(PlayerSide::O),
            _ => None,
        }
    }

    /// The identity occupying a slot, once setup has run.
    #[must_use]
    pub fn address_of(&self, side: PlayerSide) -> Option<&Address> {
        match side {
            PlayerSide::X => self.player_x.as_ref(),
            PlayerSide::O => self.player_o.as_ref(),
        }
    }

    #[must_use]
    pub fn score_of(&self, side: PlayerSide) -> Score {
        match side {
            PlayerSide::X => self.score_x,
            PlayerSide::O => self.score_o,
        }
    }

    /// Slot of the identity holding the turn.
    #[must_use]
    pub fn turn_side(&self) -> Option<PlayerSide> {
        self.turn.as_ref().and_then(|turn| self.side_of(turn))
    }

    /// Whether either stored score already sits at the winning threshold.
    #[must_use]
    pub fn has_winning_score(&self) -> bool {
        self.score_x >= WIN_THRESHOLD || self.score_o >= WIN_THRESHOLD
    }
}

impl From<GameConfig> for GameState {
    fn from(value: GameConfig) -> Self {
        Self {
            player_x: None,
            player_o: None,
            turn: None,
            escrow: None,
            action_deadline: None,
            score_x: 0,
            score_o: 0,
            status: GameStatus::Uninitialized,
            config: value,
        }
    }
}

/// Snapshot served to polling clients: enough to render progress and
/// detect completion.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameView {
    pub status: GameStatus,
    pub score_x: Score,
    pub score_o: Score,
    pub turn: Option<Address>,
    pub action_deadline: Option<DateTime<Utc>>,
}

impl From<&GameState> for GameView {
    fn from(value: &GameState) -> Self {
        Self {
            status: value.status,
            score_x: value.score_x,
            score_o: value.score_o,
            turn: value.turn.clone(),
            action_deadline: value.action_deadline,
        }
    }
}

impl fmt::Display for GameView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match &self.turn {
            Some(turn) => format!(
                "[{}] X {} : {} O, {turn} to throw",
                self.status, self.score_x, self.score_o
            ),
            None => format!("[{}] X {} : {} O", self.status, self.score_x, self.score_o),
        };
        write!(f, "{repr}")
    }
}
