//! The persisted run record.

use core::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use game_core::{
    CombatState, DungeonDeck, ModifierId, PcgRng, PlayerSnapshot, RoomCard, RunProgress,
    RunStatus,
};

use crate::error::SessionError;

/// Identifier of one run record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id from ambient entropy.
    pub fn generate() -> Self {
        let suffix: u64 = rand::thread_rng().r#gen();
        Self(format!("run-{suffix:016x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The single persisted record behind the run lock.
///
/// Everything needed to resume mid-run is here: the remaining dungeon deck,
/// the player snapshot, the RNG state, any pending room choices, and the
/// in-flight combat. Content definitions are not stored; ids are resolved
/// through the oracles on resume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LockedRunState {
    pub run_id: RunId,
    pub seed: u64,
    pub status: RunStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub progress: RunProgress,
    pub player: PlayerSnapshot,
    /// Rooms not yet drawn.
    pub deck: DungeonDeck,
    /// Room choices drawn but not yet selected.
    pub pending_choices: Vec<RoomCard>,
    /// The room currently being played, if any.
    pub current_room: Option<RoomCard>,
    pub combat: Option<CombatState>,
    pub modifiers: Vec<ModifierId>,
    /// Deterministic RNG state, advanced by every shuffle and pool pick.
    pub rng: PcgRng,
}

impl LockedRunState {
    /// Whether this record holds the run lock.
    pub fn is_active(&self) -> bool {
        self.status == RunStatus::Active
    }

    /// Transition to a terminal status, enforcing the status machine.
    pub fn transition(&mut self, next: RunStatus) -> Result<(), SessionError> {
        if !self.status.can_transition_to(next) {
            return Err(SessionError::RunAlreadyTerminal {
                run_id: self.run_id.clone(),
                status: self.status,
            });
        }
        self.status = next;
        self.touch();
        Ok(())
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::GameConfig;

    fn record() -> LockedRunState {
        let config = GameConfig::default();
        LockedRunState {
            run_id: RunId::new("run-test"),
            seed: 1,
            status: RunStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            progress: RunProgress::new(0),
            player: PlayerSnapshot {
                current_health: config.starting_health,
                max_health: config.starting_health,
                max_energy: config.base_energy,
                deck: Vec::new(),
            },
            deck: DungeonDeck::default(),
            pending_choices: Vec::new(),
            current_room: None,
            combat: None,
            modifiers: Vec::new(),
            rng: PcgRng::seeded(1),
        }
    }

    #[test]
    fn terminal_records_refuse_further_transitions() {
        let mut state = record();
        state.transition(RunStatus::Completed).unwrap();
        let err = state.transition(RunStatus::Failed).unwrap_err();
        assert!(matches!(err, SessionError::RunAlreadyTerminal { .. }));
        assert_eq!(state.status, RunStatus::Completed);
    }

    #[test]
    fn generated_run_ids_are_distinct() {
        assert_ne!(RunId::generate(), RunId::generate());
    }
}
