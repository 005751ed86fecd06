//! In-memory fakes for storage traits (testing and manifest-driven runs)
//!
//! Provides `MemoryFileStore` and `MemoryConflictRecorder` that satisfy the
//! trait contracts without any external dependencies.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StorageError;
use crate::schema::{ConflictRecord, DataFileRecord, FileId};
use crate::storage_traits::*;

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Backend("in-memory store lock poisoned".to_string())
}

// ---------------------------------------------------------------------------
// MemoryFileStore
// ---------------------------------------------------------------------------

/// In-memory file store backed by a `HashMap<FileId, DataFileRecord>`.
///
/// Counts `get_file` calls per id so tests can assert which parts of a graph
/// were actually visited.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: Mutex<HashMap<FileId, DataFileRecord>>,
    reads: Mutex<HashMap<FileId, u64>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `records`. Later records with the same
    /// id replace earlier ones.
    pub fn with_files(records: impl IntoIterator<Item = DataFileRecord>) -> Self {
        let files = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            files: Mutex::new(files),
            reads: Mutex::new(HashMap::new()),
        }
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: DataFileRecord) -> StorageResult<()> {
        let mut files = self.files.lock().map_err(poisoned)?;
        files.insert(record.id.clone(), record);
        Ok(())
    }

    /// Number of `get_file` calls made for `id`, found or not.
    pub fn reads_of(&self, id: &FileId) -> u64 {
        self.reads
            .lock()
            .map(|r| r.get(id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.files.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn get_file(&self, id: &FileId) -> StorageResult<DataFileRecord> {
        {
            let mut reads = self.reads.lock().map_err(poisoned)?;
            *reads.entry(id.clone()).or_default() += 1;
        }
        let files = self.files.lock().map_err(poisoned)?;
        files
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::FileNotFound {
                file_id: id.0.clone(),
            })
    }

    async fn list_files(&self) -> StorageResult<Vec<DataFileRecord>> {
        let files = self.files.lock().map_err(poisoned)?;
        let mut records: Vec<DataFileRecord> = files.values().cloned().collect();
        // Deterministic order for callers that print or snapshot.
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// MemoryConflictRecorder
// ---------------------------------------------------------------------------

/// In-memory conflict recorder backed by an append-only `Vec<ConflictRecord>`.
///
/// `(file, code)` is enforced as a unique key. A recorder built with
/// [`MemoryConflictRecorder::failing`] rejects every write with a backend
/// error, to exercise fatal-path handling.
#[derive(Debug, Default)]
pub struct MemoryConflictRecorder {
    records: Mutex<Vec<ConflictRecord>>,
    fail_writes: AtomicBool,
    write_attempts: AtomicU64,
}

impl MemoryConflictRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose writes always fail.
    pub fn failing() -> Self {
        let recorder = Self::default();
        recorder.fail_writes.store(true, Ordering::SeqCst);
        recorder
    }

    /// Number of `record_conflict` calls, successful or not.
    pub fn write_attempts(&self) -> u64 {
        self.write_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConflictRecorder for MemoryConflictRecorder {
    async fn record_conflict(&self, file_id: &FileId, code: &str) -> StorageResult<ConflictRecord> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!(
                "write rejected for conflict {} on {}",
                code, file_id
            )));
        }

        let mut records = self.records.lock().map_err(poisoned)?;
        if records
            .iter()
            .any(|r| r.file_id == *file_id && r.code == code)
        {
            return Err(StorageError::DuplicateConflict {
                file_id: file_id.0.clone(),
                code: code.to_string(),
            });
        }
        let record = ConflictRecord {
            file_id: file_id.clone(),
            code: code.to_string(),
            recorded_at: Utc::now(),
        };
        records.push(record.clone());
        tracing::debug!(file_id = %file_id, code = %code, "conflict stored");
        Ok(record)
    }

    async fn conflicts_for(&self, file_id: &FileId) -> StorageResult<Vec<ConflictRecord>> {
        let records = self.records.lock().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.file_id == *file_id)
            .cloned()
            .collect())
    }

    async fn list_conflicts(&self) -> StorageResult<Vec<ConflictRecord>> {
        let records = self.records.lock().map_err(poisoned)?;
        Ok(records.clone())
    }
}
