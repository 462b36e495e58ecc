//! Data-driven content catalog and loaders.
//!
//! This crate houses static game content and provides loaders for RON/TOML
//! data files:
//! - Room definitions (data-driven via RON)
//! - Card definitions (data-driven via RON)
//! - Enemy spawn templates (data-driven via RON)
//! - Run modifier definitions (data-driven via RON)
//! - Game configuration (data-driven via TOML)
//!
//! Content is consumed through the game-core oracle traits and never appears
//! in game state. A built-in starter catalog ([`Catalog::builtin`]) serves
//! demos and tests without any data directory.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::Catalog;

#[cfg(feature = "loaders")]
pub use loaders::{
    CardLoader, ConfigLoader, ContentFactory, EnemyLoader, ModifierLoader, RoomLoader,
};
