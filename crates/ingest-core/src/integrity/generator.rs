use std::sync::Arc;

use ingest_state::{ConflictRecorder, FileStore};
use tracing::debug;

use super::task::IntegrityTask;
use crate::distributed::{DataFile, DistributedFile, FileGraph};
use crate::error::{IngestError, Result};
use crate::task::TaskGenerator;

/// Produces one [`IntegrityTask`] per distributed candidate file.
///
/// Candidates are filtered and copied at construction, so the caller's
/// collection can change afterwards without affecting the generator.
pub struct IntegrityTaskGenerator {
    graph: FileGraph,
    recorder: Arc<dyn ConflictRecorder>,
    pending: std::vec::IntoIter<DistributedFile>,
}

impl IntegrityTaskGenerator {
    pub fn new(
        store: Arc<dyn FileStore>,
        recorder: Arc<dyn ConflictRecorder>,
        candidates: impl IntoIterator<Item = DataFile>,
    ) -> Self {
        let entry_points: Vec<DistributedFile> = candidates
            .into_iter()
            .filter_map(DataFile::into_distributed)
            .collect();
        debug!(entry_points = entry_points.len(), "integrity generator ready");
        Self {
            graph: FileGraph::new(store),
            recorder,
            pending: entry_points.into_iter(),
        }
    }

    /// Use every file of `store` as a candidate.
    pub async fn from_store(
        store: Arc<dyn FileStore>,
        recorder: Arc<dyn ConflictRecorder>,
    ) -> Result<Self> {
        let candidates = FileGraph::new(Arc::clone(&store)).load_all().await?;
        Ok(Self::new(store, recorder, candidates))
    }

    /// Tasks not yet handed out.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl TaskGenerator for IntegrityTaskGenerator {
    type Task = IntegrityTask;

    fn has_next(&self) -> bool {
        !self.pending.as_slice().is_empty()
    }

    fn next_task(&mut self) -> Result<IntegrityTask> {
        let entry_point = self.pending.next().ok_or(IngestError::GeneratorExhausted)?;
        Ok(IntegrityTask::new(
            entry_point,
            self.graph.clone(),
            Arc::clone(&self.recorder),
        ))
    }
}

impl std::fmt::Debug for IntegrityTaskGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrityTaskGenerator")
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}
