//! In-memory RunStateStore implementation.

use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::store::{LockedRunState, RunStateStore};

/// In-memory implementation of [`RunStateStore`], for tests and ephemeral
/// sessions.
#[derive(Default)]
pub struct InMemoryRunStore {
    slot: RwLock<Option<LockedRunState>>,
}

impl InMemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunStateStore for InMemoryRunStore {
    fn save(&self, state: &LockedRunState) -> StoreResult<()> {
        let mut slot = self.slot.write().map_err(|_| StoreError::LockPoisoned)?;
        *slot = Some(state.clone());
        Ok(())
    }

    fn load(&self) -> StoreResult<Option<LockedRunState>> {
        let slot = self.slot.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(slot.clone())
    }

    fn clear(&self) -> StoreResult<()> {
        let mut slot = self.slot.write().map_err(|_| StoreError::LockPoisoned)?;
        *slot = None;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.slot.read().map(|s| s.is_some()).unwrap_or(false)
    }
}
