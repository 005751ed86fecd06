//! Storage trait definitions for ingest integrity checks
//!
//! These traits define the two boundaries the integrity core depends on:
//! - `FileStore`: read-only access to archived file records (the file/graph
//!   loader and the candidate supplier)
//! - `ConflictRecorder`: the persistence hook that stores findings
//!
//! Both traits are async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::schema::{ConflictRecord, DataFileRecord, FileId};

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// ---------------------------------------------------------------------------
// FileStore — archived file records
// ---------------------------------------------------------------------------

/// Read-only source of file records.
///
/// Guarantees:
/// - `get_file(id)` returns the record stored under `id`, including its links
///   in their original enumeration order.
/// - A missing id yields `StorageError::FileNotFound`; every other error means
///   the backend is unusable.
/// - The store never mutates records on behalf of a reader.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Load one file record by id.
    async fn get_file(&self, id: &FileId) -> StorageResult<DataFileRecord>;

    /// All file records of the package, in no particular order.
    async fn list_files(&self) -> StorageResult<Vec<DataFileRecord>>;
}

// ---------------------------------------------------------------------------
// ConflictRecorder — integrity findings
// ---------------------------------------------------------------------------

/// Persistence hook for integrity findings.
///
/// Guarantees:
/// - `record_conflict` either durably stores the `(file, code)` association or
///   returns an error; it never drops a record silently.
/// - Concurrent writers are serialized by the implementation.
/// - `(file, code)` is a unique key; storing it twice is an error.
#[async_trait]
pub trait ConflictRecorder: Send + Sync {
    /// Associate the condition `code` with `file_id`.
    async fn record_conflict(&self, file_id: &FileId, code: &str) -> StorageResult<ConflictRecord>;

    /// Conflicts recorded against one file.
    async fn conflicts_for(&self, file_id: &FileId) -> StorageResult<Vec<ConflictRecord>>;

    /// Every conflict recorded so far, oldest first.
    async fn list_conflicts(&self) -> StorageResult<Vec<ConflictRecord>>;
}
