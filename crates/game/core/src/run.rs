//! Run-level state shared between the engine and the persistence layer.

use crate::catalog::{CardId, RoomId};

/// Lifecycle status of a run.
///
/// `Active` is the only non-terminal status. Terminal runs are kept for
/// history; they can never be resumed or transitioned again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    Active,
    Completed,
    Failed,
    Abandoned,
}

impl RunStatus {
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }

    /// Whether this status may transition to `next`.
    ///
    /// Only `Active` transitions anywhere; terminal statuses are frozen.
    pub const fn can_transition_to(&self, next: RunStatus) -> bool {
        matches!(
            (self, next),
            (
                Self::Active,
                Self::Completed | Self::Failed | Self::Abandoned
            )
        )
    }
}

/// Progress through the dungeon's linear room sequence.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunProgress {
    /// Current depth, incremented on every room resolution.
    pub floor: u32,
    /// Rooms in the dungeon deck at run start.
    pub total_rooms: usize,
    /// Definition ids of cleared rooms, in clear order.
    pub rooms_cleared: Vec<RoomId>,
}

impl RunProgress {
    pub fn new(total_rooms: usize) -> Self {
        Self {
            floor: 0,
            total_rooms,
            rooms_cleared: Vec::new(),
        }
    }

    pub fn record_cleared_room(&mut self, room: RoomId) {
        self.floor += 1;
        self.rooms_cleared.push(room);
    }

    pub fn cleared_count(&self) -> usize {
        self.rooms_cleared.len()
    }

    /// Fraction of the deck cleared, for recovery display.
    pub fn fraction(&self) -> f32 {
        if self.total_rooms == 0 {
            return 0.0;
        }
        (self.rooms_cleared.len() as f32 / self.total_rooms as f32).min(1.0)
    }
}

/// The player's persistent state between combats.
///
/// Combat-local fields (block, energy, powers) never appear here; a combat
/// starts from this snapshot and writes back only health.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSnapshot {
    pub current_health: u32,
    pub max_health: u32,
    pub max_energy: u32,
    /// The run deck as (definition id, upgraded) pairs, in acquisition order.
    pub deck: Vec<(CardId, bool)>,
}

impl PlayerSnapshot {
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Campfire rest: heal a fraction of max health, capped at max.
    pub fn rest(&mut self, amount: u32) {
        self.current_health = (self.current_health + amount).min(self.max_health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_runs_transition() {
        assert!(RunStatus::Active.can_transition_to(RunStatus::Completed));
        assert!(RunStatus::Active.can_transition_to(RunStatus::Failed));
        assert!(RunStatus::Active.can_transition_to(RunStatus::Abandoned));
        for terminal in [
            RunStatus::Completed,
            RunStatus::Failed,
            RunStatus::Abandoned,
        ] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(RunStatus::Active));
            assert!(!terminal.can_transition_to(RunStatus::Failed));
        }
        assert!(!RunStatus::Active.can_transition_to(RunStatus::Active));
    }

    #[test]
    fn progress_records_cleared_rooms_in_order() {
        let mut progress = RunProgress::new(14);
        progress.record_cleared_room(RoomId::new("rat_warren"));
        progress.record_cleared_room(RoomId::new("ember_hearth"));
        assert_eq!(progress.floor, 2);
        assert_eq!(progress.cleared_count(), 2);
        assert_eq!(progress.rooms_cleared[0], RoomId::new("rat_warren"));
        assert!((progress.fraction() - 2.0 / 14.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rest_heals_capped_at_max() {
        let mut snapshot = PlayerSnapshot {
            current_health: 20,
            max_health: 50,
            max_energy: 3,
            deck: Vec::new(),
        };
        snapshot.rest(40);
        assert_eq!(snapshot.current_health, 50);
    }
}
