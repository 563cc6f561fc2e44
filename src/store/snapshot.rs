//! Binary codec for match records moving between store instances.

use bincode::config;
use bincode::serde::{decode_from_slice, encode_to_vec};
use thiserror::Error;

use crate::game::entities::{GameId, GameState};

/// Encoded records stay tiny; anything near this bound is corrupt or
/// hostile input.
pub const MAX_SNAPSHOT_SIZE: usize = 64 * 1024;

/// Errors that can occur encoding or decoding a match record
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Failed to encode a record
    #[error("Failed to encode record: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// Failed to decode a record
    #[error("Failed to decode record: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// Record size exceeded maximum allowed
    #[error("Record size {actual} exceeds maximum {max}")]
    SnapshotTooLarge { actual: usize, max: usize },

    /// No record under the requested id
    #[error("No record for game {0}")]
    UnknownGame(GameId),
}

/// Result type for snapshot operations
pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Encode a record for transport.
pub fn encode_snapshot(state: &GameState) -> Result<Vec<u8>> {
    let bytes = encode_to_vec(state, config::standard())?;
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(SnapshotError::SnapshotTooLarge {
            actual: bytes.len(),
            max: MAX_SNAPSHOT_SIZE,
        });
    }
    Ok(bytes)
}

/// Decode a previously exported record.
pub fn decode_snapshot(bytes: &[u8]) -> Result<GameState> {
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(SnapshotError::SnapshotTooLarge {
            actual: bytes.len(),
            max: MAX_SNAPSHOT_SIZE,
        });
    }
    let (state, _) = decode_from_slice(bytes, config::standard())?;
    Ok(state)
}
