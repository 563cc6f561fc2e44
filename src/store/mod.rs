//! Durable match records and the submission driver.
//!
//! The store is deliberately dumb: validity is enforced upstream by the
//! transition rules, and `commit` replaces a record whole. `submit`
//! wires the two together for embedders (snapshot, validate, then
//! commit or discard), so a rejected group leaves its record
//! byte-for-byte untouched.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;

use crate::game::entities::{GameConfig, GameId, GameState, GameView};
use crate::game::state_machine::{self, RejectReason};
use crate::txn::AtomicGroup;

pub mod snapshot;

pub use snapshot::{MAX_SNAPSHOT_SIZE, SnapshotError};

/// In-memory table of match records, keyed by game id.
#[derive(Debug, Default)]
pub struct StateStore {
    games: HashMap<GameId, GameState>,
}

impl StateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh Uninitialized record and hand back its id.
    pub fn create(&mut self, config: GameConfig) -> GameId {
        let id = GameId::new_v4();
        self.games.insert(id, GameState::new(config));
        debug!("game {id} created");
        id
    }

    /// Whole-record snapshot.
    #[must_use]
    pub fn read(&self, id: GameId) -> Option<GameState> {
        self.games.get(&id).cloned()
    }

    /// Replace a record whole. No observer ever sees a record with only
    /// some fields updated.
    pub fn commit(&mut self, id: GameId, state: GameState) {
        self.games.insert(id, state);
    }

    /// Read model for polling clients.
    #[must_use]
    pub fn view(&self, id: GameId) -> Option<GameView> {
        self.games.get(&id).map(GameView::from)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Thread a group through the rules against the record at `id`:
    /// commit the successor on acceptance, discard it on rejection.
    pub fn submit(
        &mut self,
        id: GameId,
        group: &AtomicGroup,
        now: DateTime<Utc>,
    ) -> Result<GameView, RejectReason> {
        let state = self.read(id).ok_or(RejectReason::UnknownGame(id))?;
        match state_machine::apply_group(&state, group, now) {
            Ok(next) => {
                let view = GameView::from(&next);
                if next.status.is_terminal() && !state.status.is_terminal() {
                    info!("game {id} settled: {}", next.status);
                } else {
                    debug!("game {id} advanced: {view}");
                }
                self.commit(id, next);
                Ok(view)
            }
            Err(reason) => {
                warn!("game {id} rejected a group: {reason}");
                Err(reason)
            }
        }
    }

    /// Encode the record at `id` for transport between store instances.
    pub fn export(&self, id: GameId) -> Result<Vec<u8>, SnapshotError> {
        let state = self.games.get(&id).ok_or(SnapshotError::UnknownGame(id))?;
        snapshot::encode_snapshot(state)
    }

    /// Install a previously exported record under `id`, replacing any
    /// current record whole.
    pub fn import(&mut self, id: GameId, bytes: &[u8]) -> Result<(), SnapshotError> {
        let state = snapshot::decode_snapshot(bytes)?;
        self.commit(id, state);
        Ok(())
    }
}
