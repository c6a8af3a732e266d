//! Error types for the synchronization engine.
//!
//! All errors are strongly typed using thiserror. They are internal
//! currency: public entry points of the engine catch them, log, and degrade
//! to a safe default (previous value retained, facet left absent, empty
//! view) instead of propagating to producers or the ticking driver.

use thiserror::Error;

/// Errors raised when a setter rejects facet input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Facet '{facet}' rejected input: {reason}")]
    InvalidValue {
        facet: &'static str,
        reason: String,
    },

    #[error("Value '{raw}' for facet '{facet}' is not a valid integer")]
    UnparseableNumber {
        facet: &'static str,
        raw: String,
    },
}

/// Errors raised while parsing persisted facet values on account reload.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Persisted value under '{key}' is not valid JSON: {reason}")]
    MalformedJson {
        key: &'static str,
        reason: String,
    },

    #[error("Persisted value under '{key}' is not a decimal number: {raw}")]
    MalformedNumber {
        key: &'static str,
        raw: String,
    },

    #[error("Persisted value under '{key}' has the wrong shape: expected {expected}")]
    WrongShape {
        key: &'static str,
        expected: &'static str,
    },
}

/// Top-level error type for the engine.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

impl SyncError {
    /// Returns true if this is a setter input error.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    /// Returns true if this is a persisted-data error.
    #[must_use]
    pub const fn is_persist(&self) -> bool {
        matches!(self, Self::Persist(_))
    }
}

/// Result type alias for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;
