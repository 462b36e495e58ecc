//! Content loaders for reading game data from files.
//!
//! Loaders convert RON catalog files (and the TOML config) into the
//! [`crate::Catalog`] consumed through the game-core oracle traits. The file
//! formats deserialize straight into game-core definition types.

pub mod cards;
pub mod config;
pub mod enemies;
pub mod factory;
pub mod modifiers;
pub mod rooms;

pub use cards::CardLoader;
pub use config::ConfigLoader;
pub use enemies::EnemyLoader;
pub use factory::ContentFactory;
pub use modifiers::ModifierLoader;
pub use rooms::RoomLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
