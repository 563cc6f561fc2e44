//! Match engine core - entities, transition rules, and timeout policy.
//!
//! This module provides the authoritative match logic:
//! - Durable record and read-model types
//! - Pure transition rules for setup, throws, and settlement
//! - Deadline arithmetic and forfeiture evaluation

pub mod constants;
pub mod entities;
pub mod state_machine;
pub mod timeout;

pub use entities::{Address, GameConfig, GameState, GameStatus, GameView, PlayerSide};
pub use state_machine::{
    RejectReason, TransitionResult, TransitionRule, apply_group, apply_operation,
};
