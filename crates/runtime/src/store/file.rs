//! File-based RunStateStore implementation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::store::{LockedRunState, RunStateStore};

const RUN_FILE: &str = "run.json";

/// File-based implementation of [`RunStateStore`].
///
/// The record is stored as a single `run.json` in a flat, human-readable
/// format so a half-finished run can be inspected or hand-edited during
/// development. Writes go to a temp file followed by an atomic rename, so a
/// crash mid-checkpoint leaves the previous record intact.
pub struct FileRunStore {
    base_dir: PathBuf,
}

impl FileRunStore {
    /// Create a store rooted at `base_dir`, creating the directory if
    /// needed.
    pub fn new(base_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(StoreError::Io)?;
        Ok(Self { base_dir })
    }

    /// Default store location under the platform data directory.
    pub fn in_project_dirs(app: &str) -> StoreResult<Self> {
        let dirs = directories::ProjectDirs::from("", "", app).ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no home directory available",
            ))
        })?;
        Self::new(dirs.data_dir().join("runs"))
    }

    fn run_path(&self) -> PathBuf {
        self.base_dir.join(RUN_FILE)
    }
}

impl RunStateStore for FileRunStore {
    fn save(&self, state: &LockedRunState) -> StoreResult<()> {
        let path = self.run_path();
        let temp_path = path.with_extension("json.tmp");

        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| StoreError::Json(e.to_string()))?;

        fs::write(&temp_path, json).map_err(StoreError::Io)?;
        fs::rename(&temp_path, &path).map_err(StoreError::Io)?;

        tracing::debug!(run_id = %state.run_id, status = %state.status, "saved run record");

        Ok(())
    }

    fn load(&self) -> StoreResult<Option<LockedRunState>> {
        let path = self.run_path();
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(StoreError::Io)?;
        let state: LockedRunState = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::CorruptedData(e.to_string()))?;

        tracing::debug!(run_id = %state.run_id, "loaded run record");

        Ok(Some(state))
    }

    fn clear(&self) -> StoreResult<()> {
        let path = self.run_path();
        if path.exists() {
            fs::remove_file(&path).map_err(StoreError::Io)?;
            tracing::debug!("cleared run record");
        }
        Ok(())
    }

    fn exists(&self) -> bool {
        self.run_path().exists()
    }
}
