//! Ingest-State: storage boundary for archive integrity checks
//!
//! This crate holds everything the integrity core reads from or writes to
//! outside of its own memory: file records with their resolved links, and the
//! conflict recorder that stores integrity findings.
//!
//! ## Layer 0 - Data/Persistence
//!
//! Focus: record shapes, backend-agnostic traits, in-memory fakes.
//!
//! ## Key Components
//!
//! - `FileStore`: loads file records by id (the file/graph loader)
//! - `ConflictRecorder`: records `(file, condition code)` findings
//! - `PackageManifest`: JSON description of a package, loadable into a
//!   `MemoryFileStore`

mod error;
pub mod fakes;
pub mod manifest;
mod schema;
pub mod storage_traits;

pub use error::StorageError;
pub use manifest::PackageManifest;
pub use schema::{
    ConflictRecord, DataFileRecord, FileFormat, FileId, FileRole, LinkRecord, LinkStatus,
    PresLevel,
};
pub use storage_traits::{ConflictRecorder, FileStore, StorageResult};
