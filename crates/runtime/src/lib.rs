//! Runtime layer: run sessions, persistence, and crash recovery.
//!
//! The runtime drives the pure game-core engine against a content catalog
//! and owns everything game-core deliberately avoids: file I/O, timestamps,
//! entropy for seeds and run ids, and logging.
//!
//! - [`session::RunSession`] sequences a run and checkpoints after every
//!   state-changing operation.
//! - [`store`] persists the single run record behind the run lock.
//! - [`telemetry`] wires tracing for embedding binaries.
pub mod error;
pub mod session;
pub mod store;
pub mod telemetry;

pub use error::{SessionError, SessionResult, StoreError, StoreResult};
pub use session::{RoomOutcome, RunSession};
pub use store::{
    FileRunStore, InMemoryRunStore, LockedRunState, RecoverySummary, RunId, RunStateStore,
};
