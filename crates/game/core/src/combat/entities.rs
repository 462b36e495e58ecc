//! Battlefield entities and the stacking power system.

use std::collections::BTreeMap;

use crate::catalog::CardId;

/// Unique id of an enemy within one combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyId(pub u32);

/// Named, stacking, optionally duration-limited status effect.
///
/// A closed set: adding a power is a compile-time-checked extension, and the
/// effect engine matches exhaustively on the ones it interprets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PowerId {
    /// Incoming damage amplified by 50%.
    Vulnerable,
    /// Outgoing attack damage reduced by 25%.
    Weak,
    /// Flat bonus to outgoing attack damage per stack.
    Strength,
    /// Gains strength every turn.
    Ritual,
    /// Attackers take damage per stack.
    Thorns,
}

/// Stack state of one power on an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerStack {
    pub amount: i32,
    /// Remaining turns. `None` means the power lasts the whole combat.
    pub duration: Option<u32>,
}

/// Powers attached to an entity, keyed by power id.
///
/// Invariant: no entry is retained at zero or negative amount - reaching
/// zero removes the key entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Powers {
    entries: BTreeMap<PowerId, PowerStack>,
}

impl Powers {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Current stack amount for a power, 0 when absent.
    pub fn stacks(&self, id: PowerId) -> i32 {
        self.entries.get(&id).map(|s| s.amount).unwrap_or(0)
    }

    pub fn has(&self, id: PowerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Additively apply stacks. A resulting amount <= 0 removes the entry.
    ///
    /// A duration on the incoming application extends an existing one to the
    /// later expiry, matching how re-applied debuffs refresh.
    pub fn apply(&mut self, id: PowerId, stacks: i32, duration: Option<u32>) {
        let entry = self.entries.entry(id).or_insert(PowerStack {
            amount: 0,
            duration,
        });
        entry.amount += stacks;
        entry.duration = match (entry.duration, duration) {
            (Some(a), Some(b)) => Some(a.max(b)),
            // Either side permanent makes the power permanent
            _ => None,
        };
        if entry.amount <= 0 {
            self.entries.remove(&id);
        }
    }

    /// Remove a power outright.
    pub fn remove(&mut self, id: PowerId) {
        self.entries.remove(&id);
    }

    /// Count down turn-limited powers; expired entries are removed.
    pub fn tick_durations(&mut self) {
        self.entries.retain(|_, stack| match stack.duration.as_mut() {
            Some(turns) => {
                *turns = turns.saturating_sub(1);
                *turns > 0
            }
            None => true,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = (PowerId, &PowerStack)> {
        self.entries.iter().map(|(id, stack)| (*id, stack))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An enemy's telegraphed next action, shown before it executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    Attack { damage: u32 },
    Defend { block: u32 },
    Buff { power: PowerId, stacks: u32 },
}

/// The player in a combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerEntity {
    pub current_health: u32,
    pub max_health: u32,
    /// Absorbs damage before health; reset at each turn start.
    pub block: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub powers: Powers,
}

impl PlayerEntity {
    pub fn new(max_health: u32, max_energy: u32) -> Self {
        Self {
            current_health: max_health,
            max_health,
            block: 0,
            energy: max_energy,
            max_energy,
            powers: Powers::empty(),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Apply raw damage: block soaks first, the remainder hits health
    /// floored at 0. Returns (blocked, to_health).
    pub fn absorb_damage(&mut self, amount: u32) -> (u32, u32) {
        let blocked = amount.min(self.block);
        self.block -= blocked;
        let to_health = (amount - blocked).min(self.current_health);
        self.current_health -= to_health;
        (blocked, to_health)
    }

    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_health - self.current_health);
        self.current_health += healed;
        healed
    }
}

/// One enemy on the battlefield.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyEntity {
    pub id: EnemyId,
    pub card_id: CardId,
    pub name: String,
    pub current_health: u32,
    pub max_health: u32,
    pub block: u32,
    pub powers: Powers,
    pattern: Vec<Intent>,
    pattern_index: usize,
}

impl EnemyEntity {
    pub fn new(id: EnemyId, card_id: CardId, name: String, max_health: u32, pattern: Vec<Intent>) -> Self {
        Self {
            id,
            card_id,
            name,
            current_health: max_health,
            max_health,
            block: 0,
            powers: Powers::empty(),
            pattern,
            pattern_index: 0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// The telegraphed next action.
    pub fn intent(&self) -> Option<Intent> {
        if self.pattern.is_empty() {
            return None;
        }
        Some(self.pattern[self.pattern_index % self.pattern.len()])
    }

    /// Advance to the next action in the cycle.
    pub fn advance_intent(&mut self) {
        if !self.pattern.is_empty() {
            self.pattern_index = (self.pattern_index + 1) % self.pattern.len();
        }
    }

    /// Apply raw damage: block soaks first, the remainder hits health
    /// floored at 0. Returns (blocked, to_health).
    pub fn absorb_damage(&mut self, amount: u32) -> (u32, u32) {
        let blocked = amount.min(self.block);
        self.block -= blocked;
        let to_health = (amount - blocked).min(self.current_health);
        self.current_health -= to_health;
        (blocked, to_health)
    }
}
