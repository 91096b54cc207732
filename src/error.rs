//! Error types for recordstore
//!
//! Provides a unified error type for all operations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for recordstore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Record already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    // -------------------------------------------------------------------------
    // Payload Errors
    // -------------------------------------------------------------------------
    #[error("Malformed payload in {}: {source}", path.display())]
    MalformedPayload {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record has no about.identifier")]
    MissingIdentifier,

    // -------------------------------------------------------------------------
    // Naming Errors
    // -------------------------------------------------------------------------
    #[error("Invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Name is reserved: {0}")]
    ReservedName(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Batch task failed: {0}")]
    TaskFailed(String),
}

impl StoreError {
    /// Classify an I/O error raised while touching `path`
    ///
    /// `NotFound` and `AlreadyExists` get their own variants so callers can
    /// branch on them; everything else stays a raw `Io` error.
    pub fn from_io(error: io::Error, path: &Path) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::AlreadyExists => StoreError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => StoreError::Io(error),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}
