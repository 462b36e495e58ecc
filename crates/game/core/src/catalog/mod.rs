//! Read-only content catalog types and oracle traits.
//!
//! The catalog is consulted, never stored in combat or run state: state holds
//! ids, and definitions are looked up on demand through the oracle traits
//! implemented by the content crate. Unknown ids are content-configuration
//! errors and are classified [`ErrorSeverity::Fatal`].

use core::fmt;

use crate::combat::effect::AtomicEffect;
use crate::combat::entities::Intent;
use crate::combat::targeting::TargetShape;
use crate::error::{EngineError, ErrorSeverity};

// ============================================================================
// Content Ids
// ============================================================================

macro_rules! content_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

content_id!(
    /// Catalog key of a room definition.
    RoomId
);
content_id!(
    /// Catalog key of a card definition.
    CardId
);
content_id!(
    /// Catalog key of a run modifier definition.
    ModifierId
);

// ============================================================================
// Rooms
// ============================================================================

/// Kind of a room in the dungeon's linear progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RoomKind {
    Combat,
    Elite,
    Boss,
    Campfire,
    Treasure,
    Shop,
    Event,
}

impl RoomKind {
    /// Room kinds that place enemies on a battlefield when entered.
    pub const fn has_combat(&self) -> bool {
        matches!(self, Self::Combat | Self::Elite | Self::Boss)
    }
}

/// Immutable room definition from the content catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomDefinition {
    pub id: RoomId,
    pub kind: RoomKind,
    /// Enemy card ids spawned when this room starts a combat. Empty for
    /// non-combat rooms.
    #[cfg_attr(feature = "serde", serde(default))]
    pub monsters: Vec<CardId>,
}

// ============================================================================
// Cards
// ============================================================================

/// Card theme, determining which zone of the game a definition belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CardTheme {
    Attack,
    Skill,
    Power,
    Curse,
    Status,
    Hero,
    Enemy,
}

/// Card rarity tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CardRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// Elemental affinity, cosmetic to the engine but carried for content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Element {
    Fire,
    Frost,
    Storm,
    Void,
}

/// Energy cost of a card.
///
/// `X` is a distinct sentinel, not a number: an X-cost card is playable
/// whenever the player has at least 1 energy, and playing it consumes all
/// remaining energy. The consumed amount is exposed to effect resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnergyCost {
    Fixed(u32),
    X,
}

impl EnergyCost {
    /// Whether the card is playable at the given energy level.
    ///
    /// Boundary: `energy == cost` is playable.
    pub const fn can_play(&self, energy: u32) -> bool {
        match self {
            Self::Fixed(cost) => energy >= *cost,
            Self::X => energy >= 1,
        }
    }

    /// Energy debited when the card is played.
    pub const fn debit(&self, energy: u32) -> u32 {
        match self {
            Self::Fixed(cost) => *cost,
            Self::X => energy,
        }
    }
}

impl fmt::Display for EnergyCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(cost) => write!(f, "{cost}"),
            Self::X => f.write_str("X"),
        }
    }
}

/// Immutable card definition from the content catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub cost: EnergyCost,
    pub theme: CardTheme,
    pub rarity: CardRarity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Option<Element>,
    pub target: TargetShape,
    /// Atomic effects in application order.
    pub effects: Vec<AtomicEffect>,
    /// Id of the upgraded form, if the card upgrades.
    #[cfg_attr(feature = "serde", serde(default))]
    pub upgrades_to: Option<CardId>,
    /// Ethereal cards exhaust if still in hand at end of turn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ethereal: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
}

// ============================================================================
// Enemies
// ============================================================================

/// Template for spawning an enemy from an enemy-theme card id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub card_id: CardId,
    pub name: String,
    pub max_health: u32,
    /// Telegraphed action cycle, advanced one step per turn.
    pub pattern: Vec<Intent>,
}

// ============================================================================
// Modifiers
// ============================================================================

/// Category of a run-wide modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ModifierCategory {
    Catalyst,
    Omen,
    Edict,
    Seal,
}

/// How long a modifier survives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Durability {
    /// Spent on first use.
    Consumable,
    /// Survives a limited number of uses.
    Fragile { uses: u32 },
    /// Lasts the whole run.
    Permanent,
}

impl Durability {
    /// Consume one use. Returns false once the modifier is spent.
    pub fn consume_use(&mut self) -> bool {
        match self {
            Self::Consumable => false,
            Self::Fragile { uses } => {
                *uses = uses.saturating_sub(1);
                *uses > 0
            }
            Self::Permanent => true,
        }
    }
}

/// Immutable run-modifier definition from the content catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierDefinition {
    pub id: ModifierId,
    pub category: ModifierCategory,
    pub rarity: CardRarity,
    pub danger_value: u32,
    pub reward_value: u32,
    pub durability: Durability,
}

impl ModifierDefinition {
    /// Reward-to-danger ratio surfaced to the player.
    ///
    /// Advisory only: nothing in the engine gates on this value.
    pub fn balance_ratio(&self) -> f32 {
        if self.danger_value == 0 {
            return f32::INFINITY;
        }
        self.reward_value as f32 / self.danger_value as f32
    }

    /// "Balanced" display hint: ratio within 25% of 1.
    pub fn is_balanced(&self) -> bool {
        let ratio = self.balance_ratio();
        (0.75..=1.25).contains(&ratio)
    }
}

// ============================================================================
// Oracles
// ============================================================================

/// Unknown content id or broken content data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown room definition: {0}")]
    UnknownRoom(RoomId),

    #[error("unknown card definition: {0}")]
    UnknownCard(CardId),

    #[error("unknown enemy template: {0}")]
    UnknownEnemy(CardId),

    #[error("unknown modifier definition: {0}")]
    UnknownModifier(ModifierId),
}

impl EngineError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        // Content lookups only fail when shipped data is incomplete
        ErrorSeverity::Fatal
    }
}

/// Read-only lookup of room definitions.
pub trait RoomOracle {
    fn room(&self, id: &RoomId) -> Result<&RoomDefinition, CatalogError>;

    /// All room definitions of a kind, in stable catalog order.
    fn rooms_of_kind(&self, kind: RoomKind) -> Vec<&RoomDefinition>;
}

/// Read-only lookup of card definitions.
pub trait CardOracle {
    fn card(&self, id: &CardId) -> Result<&CardDefinition, CatalogError>;
}

/// Read-only lookup of enemy spawn templates.
pub trait EnemyOracle {
    fn enemy(&self, id: &CardId) -> Result<&EnemyTemplate, CatalogError>;
}

/// Read-only lookup of run modifier definitions.
pub trait ModifierOracle {
    fn modifier(&self, id: &ModifierId) -> Result<&ModifierDefinition, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_cost_boundary_is_playable() {
        assert!(EnergyCost::Fixed(2).can_play(2));
        assert!(EnergyCost::Fixed(2).can_play(3));
        assert!(!EnergyCost::Fixed(2).can_play(1));
    }

    #[test]
    fn x_cost_requires_one_energy_and_drains_all() {
        assert!(!EnergyCost::X.can_play(0));
        assert!(EnergyCost::X.can_play(1));
        assert_eq!(EnergyCost::X.debit(3), 3);
        assert_eq!(EnergyCost::Fixed(1).debit(3), 1);
    }

    #[test]
    fn fragile_durability_counts_down() {
        let mut durability = Durability::Fragile { uses: 2 };
        assert!(durability.consume_use());
        assert!(!durability.consume_use());
        assert!(!Durability::Consumable.consume_use());
        assert!(Durability::Permanent.consume_use());
    }

    #[test]
    fn balance_ratio_is_advisory_display_math() {
        let modifier = ModifierDefinition {
            id: ModifierId::new("test"),
            category: ModifierCategory::Omen,
            rarity: CardRarity::Common,
            danger_value: 4,
            reward_value: 5,
            durability: Durability::Permanent,
        };
        assert!(modifier.is_balanced());
        assert!((modifier.balance_ratio() - 1.25).abs() < f32::EPSILON);
    }
}
