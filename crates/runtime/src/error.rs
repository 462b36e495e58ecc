//! Error types raised by the runtime layer.

use game_core::{CatalogError, DeckBuildError, PlayError, RunStatus};

use crate::store::RunId;

/// Errors surfaced by run state stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("run store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("corrupted run record: {0}")]
    CorruptedData(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by run session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("a run is already in progress: {0}")]
    RunLocked(RunId),

    #[error("no run record exists to resume")]
    NoActiveRun,

    #[error("run {run_id} is {status} and cannot be resumed")]
    RunNotResumable { run_id: RunId, status: RunStatus },

    #[error("run {run_id} is {status}; only active runs transition")]
    RunAlreadyTerminal { run_id: RunId, status: RunStatus },

    #[error("operation requires an active combat")]
    NotInCombat,

    #[error("operation is unavailable while a combat is in progress")]
    CombatInProgress,

    #[error("no room choices have been drawn")]
    NoChoicesDrawn,

    #[error("room {0:?} is not among the drawn choices")]
    UnknownChoice(game_core::RoomUid),

    #[error("the dungeon deck is exhausted")]
    DeckExhausted,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Build(#[from] DeckBuildError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Play(#[from] PlayError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
