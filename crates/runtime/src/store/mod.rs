//! Run lock store: persistence for the single in-progress run.
//!
//! The store holds at most one run record. An `Active` record is the run
//! lock; starting a new run while one exists is refused by the session
//! layer. Static content (rooms, cards, enemies) is handled by the content
//! catalog, never by the store.

mod file;
mod memory;
mod summary;
mod types;

pub use file::FileRunStore;
pub use memory::InMemoryRunStore;
pub use summary::RecoverySummary;
pub use types::{LockedRunState, RunId};

use crate::error::StoreResult;

/// Persistence contract for the run record.
///
/// Implementations must make `save` atomic: a crash mid-write must leave
/// either the previous record or the new one, never a torn file.
pub trait RunStateStore: Send + Sync {
    /// Persist the record, replacing any existing one.
    fn save(&self, state: &LockedRunState) -> StoreResult<()>;

    /// Load the current record, if any.
    fn load(&self) -> StoreResult<Option<LockedRunState>>;

    /// Delete the record.
    fn clear(&self) -> StoreResult<()>;

    /// Whether a record exists.
    fn exists(&self) -> bool;
}
