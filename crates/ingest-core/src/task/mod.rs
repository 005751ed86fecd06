//! Task execution abstraction.
//!
//! A [`TaskGenerator`] is a one-shot, forward-only producer of [`Task`]s.
//! [`BatchExecutor`] drains a generator and applies the batch error policy:
//! package errors are counted and skipped, anything fatal aborts the batch.

pub mod executor;

use async_trait::async_trait;
use ingest_state::FileId;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use executor::{BatchExecutor, BatchReport, ParallelConfig};

/// Result of a task that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Nothing to report.
    Completed,
    /// A condition was recorded against `subject`.
    Flagged { subject: FileId, code: String },
}

impl TaskOutcome {
    pub fn is_flagged(&self) -> bool {
        matches!(self, TaskOutcome::Flagged { .. })
    }
}

/// A unit of work.
#[async_trait]
pub trait Task: Send {
    /// Run the task to completion.
    ///
    /// Fails with [`IngestError::Package`](crate::IngestError::Package) when
    /// the inspected data is invalid, or with a fatal error when the system
    /// is inconsistent.
    async fn perform(&mut self) -> Result<TaskOutcome>;

    /// Short human-readable identity for diagnostics.
    fn describe(&self) -> String;
}

/// Finite, non-restartable producer of tasks.
pub trait TaskGenerator: Send {
    type Task: Task + 'static;

    fn has_next(&self) -> bool;

    /// The next task. Calling this after [`has_next`](Self::has_next)
    /// returned false fails with
    /// [`IngestError::GeneratorExhausted`](crate::IngestError::GeneratorExhausted).
    fn next_task(&mut self) -> Result<Self::Task>;
}
