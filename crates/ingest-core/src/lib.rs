//! Ingest integrity core.
//!
//! Severity taxonomy, distributed-object model, task abstraction and the
//! preservation-level integrity checker for archive ingest.

pub mod distributed;
pub mod error;
pub mod integrity;
pub mod metrics;
pub mod obs;
pub mod severe;
pub mod task;
pub mod telemetry;

pub use distributed::{
    DataFile, Distributed, DistributedFile, FileAttrs, FileGraph, Link, LinkTable,
};
pub use error::{IngestError, Result};
pub use integrity::{
    ConflictDetail, ConflictKind, IntegrityTask, IntegrityTaskGenerator, IntegrityVerdict,
};
pub use metrics::METRICS;
pub use severe::{
    codes, elems_as_string, worst_severity, CatalogBuilder, SevereCatalog, SevereCategory,
    SevereElement, Severity,
};
pub use task::{BatchExecutor, BatchReport, ParallelConfig, Task, TaskGenerator, TaskOutcome};
pub use telemetry::init_tracing;

pub use ingest_state::{
    ConflictRecord, ConflictRecorder, DataFileRecord, FileFormat, FileId, FileRole, FileStore,
    LinkRecord, LinkStatus, PresLevel, StorageError,
};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
