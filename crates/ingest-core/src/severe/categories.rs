//! Category catalogs shared by the whole process.
//!
//! Each category owns exactly one catalog, built on first use and read-only
//! afterwards. Format-specific codes belong to format modules; the generic
//! codes every package may hit are registered here.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CatalogBuilder, SevereCatalog, Severity};
use crate::error::Result;

/// Generic condition codes.
pub mod codes {
    /// The file is in a format unknown to the archive.
    pub const FILE_UNKNOWN: &str = "L_FILE_UNKNOWN";

    pub const FILE_SIZE_MISMATCH: &str = "M_FILE_SIZE_MISMATCH";
    pub const MIME_TYPE_MISMATCH: &str = "M_MIME_TYPE_MISMATCH";
    pub const CREATOR_PROGRAM_MISMATCH: &str = "M_CREATOR_PROGRAM_MISMATCH";
    pub const COMPRESSION_MISMATCH: &str = "M_COMPRESSION_MISMATCH";

    /// A distributed object contains files with different preservation
    /// levels. Recorded against the object's entry point.
    pub const PRES_LEVEL_CONFLICT: &str = "P_PRES_LEVEL_CONFLICT";
}

/// Kinds of severe element, each with its own catalog and name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SevereCategory {
    Anomaly,
    Inhibitor,
    Limitation,
    MetadataConflict,
    PresLevelConflict,
    Quirk,
}

impl SevereCategory {
    pub const ALL: [SevereCategory; 6] = [
        SevereCategory::Anomaly,
        SevereCategory::Inhibitor,
        SevereCategory::Limitation,
        SevereCategory::MetadataConflict,
        SevereCategory::PresLevelConflict,
        SevereCategory::Quirk,
    ];

    /// Conventional name prefix of this category's codes.
    pub fn prefix(&self) -> &'static str {
        match self {
            SevereCategory::Anomaly => "A_",
            SevereCategory::Inhibitor => "I_",
            SevereCategory::Limitation => "L_",
            SevereCategory::MetadataConflict => "M_",
            SevereCategory::PresLevelConflict => "P_",
            SevereCategory::Quirk => "Q_",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SevereCategory::Anomaly => "anomaly",
            SevereCategory::Inhibitor => "inhibitor",
            SevereCategory::Limitation => "limitation",
            SevereCategory::MetadataConflict => "metadata_conflict",
            SevereCategory::PresLevelConflict => "pres_level_conflict",
            SevereCategory::Quirk => "quirk",
        }
    }

    /// The process-wide catalog for this category.
    pub fn catalog(&self) -> Result<&'static SevereCatalog> {
        static ANOMALIES: OnceLock<SevereCatalog> = OnceLock::new();
        static INHIBITORS: OnceLock<SevereCatalog> = OnceLock::new();
        static LIMITATIONS: OnceLock<SevereCatalog> = OnceLock::new();
        static METADATA_CONFLICTS: OnceLock<SevereCatalog> = OnceLock::new();
        static PRES_LEVEL_CONFLICTS: OnceLock<SevereCatalog> = OnceLock::new();
        static QUIRKS: OnceLock<SevereCatalog> = OnceLock::new();

        let cell = match self {
            SevereCategory::Anomaly => &ANOMALIES,
            SevereCategory::Inhibitor => &INHIBITORS,
            SevereCategory::Limitation => &LIMITATIONS,
            SevereCategory::MetadataConflict => &METADATA_CONFLICTS,
            SevereCategory::PresLevelConflict => &PRES_LEVEL_CONFLICTS,
            SevereCategory::Quirk => &QUIRKS,
        };
        if let Some(catalog) = cell.get() {
            return Ok(catalog);
        }
        // Two racing builders produce identical catalogs; the first one wins.
        let built = self.build()?;
        debug!(category = %self.label(), entries = built.len(), "severe catalog built");
        Ok(cell.get_or_init(|| built))
    }

    fn build(&self) -> Result<SevereCatalog> {
        let mut b = CatalogBuilder::new(*self);
        match self {
            SevereCategory::Limitation => {
                b.register(
                    codes::FILE_UNKNOWN,
                    Severity::Note,
                    "The file is an unknown format to the archive.",
                )?;
            }
            SevereCategory::MetadataConflict => {
                b.register(
                    codes::FILE_SIZE_MISMATCH,
                    Severity::Note,
                    "conflict in file size metadata",
                )?
                .register(
                    codes::MIME_TYPE_MISMATCH,
                    Severity::Note,
                    "conflict in mime type metadata",
                )?
                .register(
                    codes::CREATOR_PROGRAM_MISMATCH,
                    Severity::Note,
                    "conflict in creator program metadata",
                )?
                .register(
                    codes::COMPRESSION_MISMATCH,
                    Severity::Note,
                    "conflict in compression metadata",
                )?;
            }
            SevereCategory::PresLevelConflict => {
                b.register(
                    codes::PRES_LEVEL_CONFLICT,
                    Severity::Report,
                    "distributed object contains files with different preservation levels",
                )?;
            }
            SevereCategory::Anomaly | SevereCategory::Inhibitor | SevereCategory::Quirk => {}
        }
        Ok(b.build())
    }
}

impl fmt::Display for SevereCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_built_once() {
        let a = SevereCategory::Limitation.catalog().unwrap();
        let b = SevereCategory::Limitation.catalog().unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.category(), SevereCategory::Limitation);
    }

    #[test]
    fn test_pres_level_conflict_has_exactly_one_code() {
        let catalog = SevereCategory::PresLevelConflict.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        let elem = catalog.lookup(codes::PRES_LEVEL_CONFLICT).unwrap();
        assert_eq!(elem.severity, Severity::Report);
    }

    #[test]
    fn test_generic_codes_follow_prefix_convention() {
        for category in SevereCategory::ALL {
            let catalog = category.catalog().unwrap();
            for name in catalog.names() {
                assert!(
                    name.starts_with(category.prefix()),
                    "{name} lacks prefix {}",
                    category.prefix()
                );
            }
        }
    }

    #[test]
    fn test_metadata_conflicts_are_notes() {
        let catalog = SevereCategory::MetadataConflict.catalog().unwrap();
        assert_eq!(catalog.len(), 4);
        assert!(catalog
            .snapshot()
            .iter()
            .all(|e| e.severity == Severity::Note));
    }

    #[test]
    fn test_codes_are_not_shared_across_categories() {
        let limitations = SevereCategory::Limitation.catalog().unwrap();
        assert!(limitations.is_valid(codes::FILE_UNKNOWN));
        assert!(!limitations.is_valid(codes::PRES_LEVEL_CONFLICT));
    }
}
