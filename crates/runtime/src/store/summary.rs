//! Recovery summary shown before resuming an interrupted run.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use game_core::RunStatus;

use crate::error::StoreResult;
use crate::store::{LockedRunState, RunId, RunStateStore};

/// What a player sees when the app restarts with a run record on disk.
///
/// A pure projection of the record; building one mutates nothing and is
/// idempotent, so it can be shown before the player decides to resume or
/// abandon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecoverySummary {
    pub run_id: RunId,
    pub status: RunStatus,
    pub title: String,
    pub subtitle: String,
    pub floor: u32,
    pub rooms_cleared: usize,
    pub rooms_remaining: usize,
    /// Cleared fraction of the dungeon deck, in `0.0..=1.0`.
    pub progress: f32,
    pub player_health: u32,
    pub player_max_health: u32,
    /// Turn counter of the interrupted combat, if one was in flight.
    pub combat_turn: Option<u32>,
    pub locked_at: DateTime<Utc>,
}

impl RecoverySummary {
    /// Summarize a persisted run record.
    pub fn of(state: &LockedRunState) -> Self {
        let subtitle = match (&state.combat, state.status) {
            (_, status) if status.is_terminal() => format!("run {status}"),
            (Some(combat), _) => format!("in combat, turn {}", combat.turn),
            (None, _) => format!(
                "{} of {} rooms cleared",
                state.progress.cleared_count(),
                state.progress.total_rooms
            ),
        };
        Self {
            run_id: state.run_id.clone(),
            status: state.status,
            title: format!("Floor {}", state.progress.floor),
            subtitle,
            floor: state.progress.floor,
            rooms_cleared: state.progress.cleared_count(),
            rooms_remaining: state.deck.rooms_remaining() + state.pending_choices.len(),
            progress: state.progress.fraction(),
            player_health: state.player.current_health,
            player_max_health: state.player.max_health,
            combat_turn: state.combat.as_ref().map(|c| c.turn),
            locked_at: state.updated_at,
        }
    }

    /// Summarize whatever record the store holds, without mutating it.
    pub fn load(store: &dyn RunStateStore) -> StoreResult<Option<Self>> {
        Ok(store.load()?.map(|state| Self::of(&state)))
    }

    /// Whether the summarized run can actually be resumed.
    pub fn is_resumable(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Time since the last checkpoint.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.locked_at)
    }
}
