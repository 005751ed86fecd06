//! Severity taxonomy: named, severity-classified conditions.
//!
//! Provides:
//! - [`Severity`] — treatment policy codes (BIT, NOTE, REJECT, REPORT, UNKNOWN)
//! - [`SevereElement`] — one condition; owned copies carry per-file context
//! - [`CatalogBuilder`] / [`SevereCatalog`] — validated, frozen registries
//! - [`SevereCategory`] — one process-wide catalog per category
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use ingest_core::severe::{codes, SevereCategory};
//!
//! let conflict = SevereCategory::PresLevelConflict
//!     .catalog()?
//!     .lookup(codes::PRES_LEVEL_CONFLICT)?;
//! ```

pub mod catalog;
pub mod categories;
pub mod element;
pub mod severity;

pub use catalog::{CatalogBuilder, SevereCatalog, MAX_DESC_LEN, MAX_NAME_LEN};
pub use categories::{codes, SevereCategory};
pub use element::{elems_as_string, worst_severity, SevereElement};
pub use severity::Severity;
