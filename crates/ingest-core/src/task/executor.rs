//! Batch executor for task generators.

use std::time::Instant;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::Instrument;
use uuid::Uuid;

use super::{Task, TaskGenerator, TaskOutcome};
use crate::error::{IngestError, Result};
use crate::obs;

/// Configuration for [`BatchExecutor::run_parallel`].
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Maximum number of tasks in flight; 0 is treated as 1.
    pub max_concurrent: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

/// Summary of one executed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    /// Tasks that ran to completion, flagged or not.
    pub performed: u64,
    /// Tasks that recorded a condition.
    pub flagged: u64,
    /// Tasks that failed with a package error and were skipped.
    pub package_errors: u64,
    pub duration_ms: u64,
}

impl BatchReport {
    fn new(batch_id: Uuid) -> Self {
        Self {
            batch_id,
            performed: 0,
            flagged: 0,
            package_errors: 0,
            duration_ms: 0,
        }
    }

    /// Fold one task result into the report; fatal errors come back out.
    fn absorb(&mut self, task: &str, result: Result<TaskOutcome>) -> Result<()> {
        match result {
            Ok(outcome) => {
                self.performed += 1;
                if outcome.is_flagged() {
                    self.flagged += 1;
                }
                Ok(())
            }
            Err(err) if !err.is_fatal() => {
                obs::emit_batch_task_failed(&self.batch_id, task, &err, false);
                self.package_errors += 1;
                Ok(())
            }
            Err(err) => {
                obs::emit_batch_task_failed(&self.batch_id, task, &err, true);
                Err(IngestError::aborted(task, err))
            }
        }
    }
}

/// Drives task generators to exhaustion.
#[derive(Debug, Clone)]
pub struct BatchExecutor {
    batch_id: Uuid,
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchExecutor {
    pub fn new() -> Self {
        Self {
            batch_id: Uuid::new_v4(),
        }
    }

    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    /// Perform every task of `generator` in order, on the calling task.
    pub async fn run<G: TaskGenerator>(&self, mut generator: G) -> Result<BatchReport> {
        let batch_id = self.batch_id;
        async move {
            obs::emit_batch_started(&batch_id, 1);
            let started = Instant::now();
            let mut report = BatchReport::new(batch_id);

            while generator.has_next() {
                let mut task = generator.next_task()?;
                let name = task.describe();
                let result = task.perform().await;
                report.absorb(&name, result)?;
            }

            report.duration_ms = started.elapsed().as_millis() as u64;
            obs::emit_batch_finished(&report);
            Ok(report)
        }
        .instrument(obs::batch_span(&batch_id))
        .await
    }

    /// Perform the tasks of `generator` concurrently, at most
    /// `config.max_concurrent` at a time.
    ///
    /// The generator is drained on the calling task. Finished tasks are
    /// folded into the report before the next one is pulled, and the first
    /// fatal error aborts the tasks still running.
    pub async fn run_parallel<G: TaskGenerator>(
        &self,
        mut generator: G,
        config: ParallelConfig,
    ) -> Result<BatchReport> {
        let batch_id = self.batch_id;
        let limit = config.max_concurrent.max(1);
        async move {
            obs::emit_batch_started(&batch_id, limit);
            let started = Instant::now();
            let mut report = BatchReport::new(batch_id);
            let mut tasks: JoinSet<(String, Result<TaskOutcome>)> = JoinSet::new();

            while generator.has_next() {
                while let Some(Some(joined)) = tasks.join_next().now_or_never() {
                    absorb_joined(&mut report, &mut tasks, joined)?;
                }
                while tasks.len() >= limit {
                    if let Some(joined) = tasks.join_next().await {
                        absorb_joined(&mut report, &mut tasks, joined)?;
                    }
                }

                let mut task = generator.next_task()?;
                let span = tracing::Span::current();
                tasks.spawn(
                    async move {
                        let name = task.describe();
                        let result = task.perform().await;
                        (name, result)
                    }
                    .instrument(span),
                );
            }

            while let Some(joined) = tasks.join_next().await {
                absorb_joined(&mut report, &mut tasks, joined)?;
            }

            report.duration_ms = started.elapsed().as_millis() as u64;
            obs::emit_batch_finished(&report);
            Ok(report)
        }
        .instrument(obs::batch_span(&batch_id))
        .await
    }
}

type Joined = std::result::Result<(String, Result<TaskOutcome>), tokio::task::JoinError>;

/// Fold a joined task into `report`; on a fatal error the remaining tasks
/// are aborted.
fn absorb_joined(
    report: &mut BatchReport,
    tasks: &mut JoinSet<(String, Result<TaskOutcome>)>,
    joined: Joined,
) -> Result<()> {
    let outcome = joined
        .map_err(IngestError::from)
        .and_then(|(name, result)| report.absorb(&name, result));
    if outcome.is_err() {
        tasks.abort_all();
    }
    outcome
}
