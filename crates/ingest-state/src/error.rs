//! Error types for ingest-state

use thiserror::Error;

/// Errors raised at the storage boundary.
///
/// Every variant except `FileNotFound` indicates that the backend itself is in
/// a bad state; callers treat those as unrecoverable.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No record exists for the requested file id
    #[error("file not found: {file_id}")]
    FileNotFound { file_id: String },

    /// A conflict with the same (file, code) key was already stored
    #[error("conflict {code} already recorded for file {file_id}")]
    DuplicateConflict { file_id: String, code: String },

    /// Backend failure (connection lost, write rejected, ...)
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// Package manifest is structurally invalid
    #[error("invalid package manifest: {0}")]
    Manifest(String),

    /// Filesystem error while reading a manifest
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// True when the error only says that a file is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::FileNotFound { .. })
    }
}
