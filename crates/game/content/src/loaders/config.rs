//! Game configuration loader.

use std::path::Path;

use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`GameConfig`] from a TOML file.
    ///
    /// Values that would make every run unwinnable (zero hand size, zero
    /// starting health) are rejected here rather than deep in the engine.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        let config: GameConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        if config.hand_size == 0 {
            anyhow::bail!("config hand_size must be at least 1");
        }
        if config.room_choices == 0 {
            anyhow::bail!("config room_choices must be at least 1");
        }
        if config.starting_health == 0 {
            anyhow::bail!("config starting_health must be at least 1");
        }
        Ok(config)
    }
}
