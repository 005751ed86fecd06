//! Structured observability hooks for batches and integrity checks.
//!
//! Events are emitted at `info!` level with an `event` key, so they can be
//! filtered with `RUST_LOG` and aggregated from JSON output.

use ingest_state::FileId;
use tracing::{info, warn};
use uuid::Uuid;

use crate::integrity::ConflictDetail;
use crate::severe::Severity;
use crate::task::BatchReport;

/// Span carrying the batch id; every event inside it is tagged with it.
pub fn batch_span(batch_id: &Uuid) -> tracing::Span {
    tracing::info_span!("ingest.batch", batch_id = %batch_id)
}

/// RAII guard that enters a batch span for synchronous code.
///
/// Async code should use [`batch_span`] with `Instrument` instead, since an
/// entered span must not be held across `.await`.
pub struct BatchSpan {
    _span: tracing::span::EnteredSpan,
}

impl BatchSpan {
    pub fn enter(batch_id: &Uuid) -> Self {
        Self {
            _span: batch_span(batch_id).entered(),
        }
    }
}

pub fn emit_batch_started(batch_id: &Uuid, max_concurrent: usize) {
    info!(event = "batch.started", batch_id = %batch_id, max_concurrent = max_concurrent);
}

pub fn emit_batch_finished(report: &BatchReport) {
    info!(
        event = "batch.finished",
        batch_id = %report.batch_id,
        performed = report.performed,
        flagged = report.flagged,
        package_errors = report.package_errors,
        duration_ms = report.duration_ms,
    );
}

/// Emit event: a task failed. Fatal failures abort the batch.
pub fn emit_batch_task_failed(
    batch_id: &Uuid,
    task: &str,
    error: &dyn std::fmt::Display,
    fatal: bool,
) {
    warn!(
        event = "batch.task_failed",
        batch_id = %batch_id,
        task = %task,
        error = %error,
        fatal = fatal,
    );
}

pub fn emit_integrity_task_started(entry_point: &FileId, links: usize) {
    info!(event = "integrity.task_started", entry_point = %entry_point, links = links);
}

/// Emit event: a preservation-level conflict was recorded on `entry_point`.
pub fn emit_conflict_recorded(
    entry_point: &FileId,
    code: &str,
    severity: Severity,
    detail: &ConflictDetail,
) {
    info!(
        event = "integrity.conflict_recorded",
        entry_point = %entry_point,
        code = %code,
        severity = %severity,
        detail = %detail,
    );
}

pub fn emit_integrity_task_finished(entry_point: &FileId, nodes_visited: usize, conflict: bool) {
    info!(
        event = "integrity.task_finished",
        entry_point = %entry_point,
        nodes_visited = nodes_visited,
        conflict = conflict,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_span_create() {
        let _span = BatchSpan::enter(&Uuid::new_v4());
    }
}
