//! Room catalog loader.

use std::path::Path;

use game_core::RoomDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Room catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCatalog {
    pub rooms: Vec<RoomDefinition>,
}

/// Loader for the room catalog from RON files.
pub struct RoomLoader;

impl RoomLoader {
    /// Load room definitions from a RON file containing a [`RoomCatalog`].
    pub fn load(path: &Path) -> LoadResult<Vec<RoomDefinition>> {
        let content = read_file(path)?;
        let catalog: RoomCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse room catalog RON: {}", e))?;
        Ok(catalog.rooms)
    }
}
