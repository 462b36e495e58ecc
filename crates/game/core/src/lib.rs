//! Deterministic run and combat rules shared across clients.
//!
//! `game-core` defines the canonical engine state (dungeon deck, card piles,
//! combat entities) and exposes pure APIs over it. Content is consulted
//! through the oracle traits in [`catalog`] and never stored in state, and
//! every random decision flows through [`rng::DeckRng`], so identical seeds
//! replay identical runs.
pub mod catalog;
pub mod combat;
pub mod config;
pub mod dungeon;
pub mod error;
pub mod rng;
pub mod run;

pub use catalog::{
    CardDefinition, CardId, CardOracle, CardRarity, CardTheme, CatalogError, Durability,
    Element, EnemyOracle, EnemyTemplate, EnergyCost, ModifierCategory, ModifierDefinition,
    ModifierId, ModifierOracle, RoomDefinition, RoomId, RoomKind, RoomOracle,
};
pub use combat::{
    AtomicEffect, BattlefieldTarget, CardInstance, CardPiles, CardUid, CombatOutcome,
    CombatState, EffectDelta, EnemyAction, EnemyEntity, EnemyId, Intent, InteractionSession,
    Pile, PlayError, PlayOutcome, PlayerEntity, PowerId, Powers, ResolvedTarget, TargetError,
    TargetShape, TurnReport,
};
pub use config::GameConfig;
pub use dungeon::{
    DeckBuildError, DungeonDeck, DungeonDeckBuilder, DungeonDeckDefinition, DungeonRoom,
    RoomCard, RoomChoices, RoomUid,
};
pub use error::{EngineError, ErrorSeverity};
pub use rng::{DeckRng, PcgRng};
pub use run::{PlayerSnapshot, RunProgress, RunStatus};
