//! Error types for SlotKV
//!
//! Provides a unified error type for all container operations, plus a coarse
//! [`ErrorKind`] classification callers can match on.

use std::path::PathBuf;

use thiserror::Error;

use crate::container::Key;

/// Result type alias using SlotError
pub type Result<T> = std::result::Result<T, SlotError>;

/// Unified error type for SlotKV operations
#[derive(Debug, Error)]
pub enum SlotError {
    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Key {key} {reason}")]
    NotFound { key: Key, reason: &'static str },

    // -------------------------------------------------------------------------
    // State Errors
    // -------------------------------------------------------------------------
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Underlying file-system failure, wrapped with the operation it broke
    #[error("IO error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Integrity Errors
    // -------------------------------------------------------------------------
    #[error("Integrity failure: {0}")]
    Integrity(String),

    #[error("Corrupt metadata file {}: {reason}", .path.display())]
    MetadataCorrupt { path: PathBuf, reason: String },
}

/// Coarse classification of a [`SlotError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad key, value or constructor input
    InvalidArgument,
    /// Key never reserved, out of range, or tombstoned
    NotFound,
    /// Closed container, duplicate open, or a wrapped I/O fault
    IllegalState,
    /// Stored data disagrees with what the container expects
    IntegrityFailure,
}

impl SlotError {
    /// Map this error onto its [`ErrorKind`]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SlotError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            SlotError::NotFound { .. } => ErrorKind::NotFound,
            SlotError::IllegalState(_) | SlotError::Io { .. } => ErrorKind::IllegalState,
            SlotError::Integrity(_) | SlotError::MetadataCorrupt { .. } => {
                ErrorKind::IntegrityFailure
            }
        }
    }

    /// Wrap an I/O error with the operation that was running
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SlotError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn not_found(key: Key, reason: &'static str) -> Self {
        SlotError::NotFound { key, reason }
    }

    pub(crate) fn closed() -> Self {
        SlotError::IllegalState("Container is not open".to_string())
    }
}

/// Attach a context string to an `io::Result`
pub(crate) trait IoContext<T> {
    fn context(self, context: impl FnOnce() -> String) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn context(self, context: impl FnOnce() -> String) -> Result<T> {
        self.map_err(|e| SlotError::io(context(), e))
    }
}
