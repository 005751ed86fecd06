//! Preservation-level integrity of distributed objects.
//!
//! Every file reachable from an entry point must share the entry point's
//! preservation level; otherwise the object could not be migrated
//! consistently. A walk that finds a mismatch or a missing link target
//! records one `P_PRES_LEVEL_CONFLICT` against the entry point and stops.

pub mod generator;
pub mod task;

pub use generator::IntegrityTaskGenerator;
pub use task::{ConflictDetail, ConflictKind, IntegrityTask, IntegrityVerdict};
