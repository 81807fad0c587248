//! Error handling for the compass service.
//!
//! Store failures terminate the current message, never the worker: the
//! worker logs the error, drops the message and moves on to the next one.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type CompassResult<T> = Result<T, CompassError>;

/// Errors surfaced by the presence-store layer and the worker dispatch.
#[derive(Debug, Error)]
pub enum CompassError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corrupted data: {0}")]
    CorruptedData(String),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Store error: {0}")]
    Store(String),
}

impl From<bincode::Error> for CompassError {
    fn from(err: bincode::Error) -> Self {
        CompassError::Serialization(err.to_string())
    }
}
