//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (e.g., `DeckBuildError`, `PlayError`) are defined in
//! their respective modules alongside the operations they validate. This module
//! provides the shared severity classification used across all of them.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each operation has its own error type with specific variants
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **Determinism**: Error construction never consults ambient state

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: Normal, frequent rejections the UI handles locally
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Corrupted or incomplete content data; cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable rejection - no state mutated, the action can be retried.
    ///
    /// Examples: insufficient energy, no legal target under the pointer
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: card uid not in hand, unknown enemy id
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: pile arena desync, missing expected instance
    /// These indicate bugs and should be investigated.
    Internal,

    /// Fatal error - content configuration is corrupted, cannot continue.
    ///
    /// Examples: empty room pool for a required room type, unknown card id
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or broken content.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game-core errors.
///
/// Provides a uniform interface for error classification so the runtime can
/// decide between "snap the card back" and "abort the run loudly" without
/// matching on every concrete error type.
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
