//! Run modifier loader.

use std::path::Path;

use game_core::ModifierDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Modifier catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierCatalog {
    pub modifiers: Vec<ModifierDefinition>,
}

/// Loader for run modifier definitions from RON files.
pub struct ModifierLoader;

impl ModifierLoader {
    /// Load modifier definitions from a RON file containing a
    /// [`ModifierCatalog`].
    pub fn load(path: &Path) -> LoadResult<Vec<ModifierDefinition>> {
        let content = read_file(path)?;
        let catalog: ModifierCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse modifier catalog RON: {}", e))?;
        Ok(catalog.modifiers)
    }
}
