//! Integrity check of one distributed object.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use ingest_state::{ConflictRecorder, FileId, PresLevel, StorageError};
use tracing::debug;

use crate::distributed::{Distributed, DistributedFile, FileGraph};
use crate::error::Result;
use crate::metrics::METRICS;
use crate::obs;
use crate::severe::{codes, SevereCategory};
use crate::task::{Task, TaskOutcome};

/// Why a walk stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// The link target is missing from the package.
    Unresolved,
    /// The link target has another preservation level than the entry point.
    LevelMismatch { expected: PresLevel, found: PresLevel },
}

/// Where a walk found its conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictDetail {
    /// File owning the offending link.
    pub node: FileId,
    pub alias: String,
    /// Target the link resolved to, when it resolved at all.
    pub target: Option<FileId>,
    pub kind: ConflictKind,
}

impl fmt::Display for ConflictDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConflictKind::Unresolved => {
                write!(f, "{}: link '{}' has no target", self.node, self.alias)
            }
            ConflictKind::LevelMismatch { expected, found } => write!(
                f,
                "{}: link '{}' targets {} at {} (expected {})",
                self.node,
                self.alias,
                self.target
                    .as_ref()
                    .map(FileId::as_str)
                    .unwrap_or("<unknown>"),
                found.as_str(),
                expected.as_str()
            ),
        }
    }
}

/// Result of walking one distributed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityVerdict {
    Consistent { nodes_visited: usize },
    Conflict(ConflictDetail),
}

impl IntegrityVerdict {
    pub fn is_conflict(&self) -> bool {
        matches!(self, IntegrityVerdict::Conflict(_))
    }
}

/// Checks that every file reachable from one entry point shares the entry
/// point's preservation level.
pub struct IntegrityTask {
    entry_point: DistributedFile,
    visited: HashSet<FileId>,
    graph: FileGraph,
    recorder: Arc<dyn ConflictRecorder>,
}

impl IntegrityTask {
    pub fn new(
        entry_point: DistributedFile,
        graph: FileGraph,
        recorder: Arc<dyn ConflictRecorder>,
    ) -> Self {
        Self {
            entry_point,
            visited: HashSet::new(),
            graph,
            recorder,
        }
    }

    pub fn entry_point(&self) -> &DistributedFile {
        &self.entry_point
    }

    /// Distributed files reached by the last walk, entry point included.
    pub fn visited(&self) -> &HashSet<FileId> {
        &self.visited
    }

    /// Walk the object without recording anything.
    pub async fn check(&mut self) -> Result<IntegrityVerdict> {
        self.visited.clear();
        self.visited
            .insert(self.entry_point.file_id().clone());
        let expected = self.entry_point.pres_level();
        let found = verify(&self.graph, &self.entry_point, expected, &mut self.visited).await?;
        Ok(match found {
            Some(detail) => IntegrityVerdict::Conflict(detail),
            None => IntegrityVerdict::Consistent {
                nodes_visited: self.visited.len(),
            },
        })
    }
}

/// Depth-first walk below `node`, stopping at the first conflict.
///
/// Distributed targets are entered at most once per walk.
fn verify<'a>(
    graph: &'a FileGraph,
    node: &'a dyn Distributed,
    expected: &'a PresLevel,
    visited: &'a mut HashSet<FileId>,
) -> BoxFuture<'a, Result<Option<ConflictDetail>>> {
    async move {
        if node.is_descriptor() {
            return Ok(None);
        }
        for link in node.links() {
            if !link.in_scope() {
                continue;
            }
            let target_id = node.target_of(link.alias());
            let target = match target_id {
                Some(id) => graph.load(id).await?,
                None => None,
            };
            let conflict = |kind: ConflictKind| ConflictDetail {
                node: node.file_id().clone(),
                alias: link.alias().to_string(),
                target: target_id.cloned(),
                kind,
            };

            let Some(target) = target else {
                return Ok(Some(conflict(ConflictKind::Unresolved)));
            };
            if target.pres_level() != expected {
                return Ok(Some(conflict(ConflictKind::LevelMismatch {
                    expected: expected.clone(),
                    found: target.pres_level().clone(),
                })));
            }
            let Some(next) = target.as_distributed() else {
                continue;
            };
            if !visited.insert(next.file_id().clone()) {
                continue;
            }
            if let Some(detail) = verify(graph, next, expected, visited).await? {
                return Ok(Some(detail));
            }
        }
        Ok(None)
    }
    .boxed()
}

#[async_trait]
impl Task for IntegrityTask {
    async fn perform(&mut self) -> Result<TaskOutcome> {
        let entry_id = self.entry_point.file_id().clone();
        obs::emit_integrity_task_started(&entry_id, self.entry_point.links().len());

        let verdict = self.check().await?;
        METRICS.inc_tasks_performed();
        METRICS.add_nodes_visited(self.visited.len() as u64);

        let detail = match verdict {
            IntegrityVerdict::Consistent { nodes_visited } => {
                obs::emit_integrity_task_finished(&entry_id, nodes_visited, false);
                return Ok(TaskOutcome::Completed);
            }
            IntegrityVerdict::Conflict(detail) => detail,
        };

        let element = SevereCategory::PresLevelConflict
            .catalog()?
            .lookup(codes::PRES_LEVEL_CONFLICT)?
            .with_subject(entry_id.clone());
        match self.recorder.record_conflict(&entry_id, &element.name).await {
            Ok(_) => METRICS.inc_conflicts_recorded(),
            Err(StorageError::DuplicateConflict { .. }) => {
                debug!(file_id = %entry_id, code = %element.name, "conflict already recorded");
            }
            Err(err) => return Err(err.into()),
        }
        obs::emit_conflict_recorded(&entry_id, &element.name, element.severity, &detail);
        obs::emit_integrity_task_finished(&entry_id, self.visited.len(), true);

        Ok(TaskOutcome::Flagged {
            subject: entry_id,
            code: element.name,
        })
    }

    fn describe(&self) -> String {
        format!("integrity check of {}", self.entry_point.file_id())
    }
}

impl fmt::Debug for IntegrityTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrityTask")
            .field("entry_point", self.entry_point.file_id())
            .field("visited", &self.visited.len())
            .finish_non_exhaustive()
    }
}
