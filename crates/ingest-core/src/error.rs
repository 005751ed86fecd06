//! Error taxonomy for ingest integrity checks.
//!
//! Two kinds of failure travel through this crate. Fatal errors mean the
//! system itself is inconsistent (bad catalog configuration, storage faults,
//! contract violations) and abort the batch. `Package` errors mean the data
//! under inspection is bad; a batch logs them and moves on to the next task.
//! A detected integrity conflict is neither: it is recorded and returned as a
//! normal outcome.

use ingest_state::StorageError;

/// Errors produced by the integrity core.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// A severe element failed validation while a catalog was being built.
    #[error("invalid severe element {field}: {value}")]
    InvalidSevereElement { field: &'static str, value: String },

    /// The same severe element name was registered twice in one catalog.
    #[error("severe element {name} registered twice in {category} catalog")]
    DuplicateSevereElement { category: String, name: String },

    /// Lookup of a condition code the catalog does not know.
    #[error("unknown severe element: {0}")]
    UnknownSevereElement(String),

    /// `next_task` was called on an exhausted generator.
    #[error("task generator exhausted")]
    GeneratorExhausted,

    /// A stored record cannot be turned into a domain value.
    #[error("invalid record for file {file_id}: {reason}")]
    InvalidRecord { file_id: String, reason: String },

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A task failed fatally; the batch was aborted.
    #[error("task {task} aborted: {source}")]
    TaskAborted {
        task: String,
        #[source]
        source: Box<IngestError>,
    },

    /// A spawned task panicked or was cancelled.
    #[error("task join failed: {0}")]
    Join(String),

    /// Package-level validation failure; recoverable at batch level.
    #[error("package error: {0}")]
    Package(String),
}

impl IngestError {
    /// Whether this error must abort the enclosing batch.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, IngestError::Package(_))
    }

    pub(crate) fn aborted(task: impl Into<String>, source: IngestError) -> Self {
        IngestError::TaskAborted {
            task: task.into(),
            source: Box::new(source),
        }
    }
}

impl From<tokio::task::JoinError> for IngestError {
    fn from(err: tokio::task::JoinError) -> Self {
        IngestError::Join(err.to_string())
    }
}

/// Result type for integrity core operations.
pub type Result<T> = std::result::Result<T, IngestError>;
