//! Record shapes exchanged with the storage layer
//!
//! Records:
//! - `DataFileRecord`: one archived file with its preservation level and the
//!   links resolved for it during ingest
//! - `LinkRecord`: one typed link out of a file
//! - `ConflictRecord`: a stored `(file, condition code)` finding

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of an archived file (the archive's DFID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        FileId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FileId {
    fn from(s: &str) -> Self {
        FileId(s.to_string())
    }
}

impl From<String> for FileId {
    fn from(s: String) -> Self {
        FileId(s)
    }
}

/// Preservation level code.
///
/// Levels are opaque string codes compared byte-for-byte. The archive's
/// agreement tables use the upper-case constants below, but nothing here
/// forbids other codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresLevel(pub String);

impl PresLevel {
    /// Full preservation (normalization and migration)
    pub const FULL: &'static str = "FULL";
    /// Bit-level preservation only
    pub const BIT: &'static str = "BIT";
    /// Do not archive
    pub const NONE: &'static str = "NONE";
    /// Not yet determined
    pub const UNKNOWN: &'static str = "UNKNOWN";

    pub fn new(code: impl Into<String>) -> Self {
        PresLevel(code.into())
    }

    pub fn full() -> Self {
        PresLevel::new(Self::FULL)
    }

    pub fn bit() -> Self {
        PresLevel::new(Self::BIT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PresLevel {
    fn default() -> Self {
        PresLevel::new(Self::UNKNOWN)
    }
}

impl fmt::Display for PresLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role a file plays inside its package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileRole {
    ContentFile,
    DescriptorSip,
    DescriptorAip,
    DescriptorDip,
    DescriptorGfp,
    Schema,
    #[default]
    Unknown,
}

impl FileRole {
    /// Descriptors carry package metadata, not preserved content.
    pub fn is_descriptor(&self) -> bool {
        matches!(
            self,
            FileRole::DescriptorSip
                | FileRole::DescriptorAip
                | FileRole::DescriptorDip
                | FileRole::DescriptorGfp
        )
    }
}

/// Coarse format family assigned by format identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileFormat {
    Xml,
    Xsd,
    Dtd,
    Html,
    Pdf,
    Tiff,
    Jpeg,
    Jpeg2000,
    Wave,
    Avi,
    QuickTime,
    Text,
    Csv,
    #[default]
    Unknown,
}

impl FileFormat {
    /// Formats whose content can reference other files of the package.
    pub fn supports_links(&self) -> bool {
        matches!(
            self,
            FileFormat::Xml | FileFormat::Xsd | FileFormat::Dtd | FileFormat::Html | FileFormat::Pdf
        )
    }
}

/// Outcome of resolving one link during ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkStatus {
    #[default]
    Unknown,
    Successful,
    Broken,
    Ignored,
}

impl LinkStatus {
    /// Broken and ignored links were already reported by link resolution.
    pub fn is_settled_failure(&self) -> bool {
        matches!(self, LinkStatus::Broken | LinkStatus::Ignored)
    }
}

/// A typed link out of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Alias of the link, unique within the owning file
    pub alias: String,
    /// Resolution status
    #[serde(default)]
    pub status: LinkStatus,
    /// Path as written in the source file, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_path: Option<String>,
    /// File the link resolved to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<FileId>,
}

impl LinkRecord {
    /// A successfully resolved link.
    pub fn resolved(alias: impl Into<String>, target: impl Into<FileId>) -> Self {
        Self {
            alias: alias.into(),
            status: LinkStatus::Successful,
            rel_path: None,
            target: Some(target.into()),
        }
    }

    /// A link with the given status and no resolved target.
    pub fn unresolved(alias: impl Into<String>, status: LinkStatus) -> Self {
        Self {
            alias: alias.into(),
            status,
            rel_path: None,
            target: None,
        }
    }

    pub fn with_status(mut self, status: LinkStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_rel_path(mut self, rel_path: impl Into<String>) -> Self {
        self.rel_path = Some(rel_path.into());
        self
    }
}

/// One archived file as stored after ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFileRecord {
    pub id: FileId,
    /// Path of the file inside its package
    #[serde(default)]
    pub package_path: String,
    #[serde(default)]
    pub role: FileRole,
    #[serde(default)]
    pub format: FileFormat,
    #[serde(default)]
    pub pres_level: PresLevel,
    /// Links in the order they appear in the file
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkRecord>,
}

impl DataFileRecord {
    pub fn new(id: impl Into<FileId>, format: FileFormat, pres_level: PresLevel) -> Self {
        let id = id.into();
        Self {
            package_path: id.0.clone(),
            id,
            role: FileRole::ContentFile,
            format,
            pres_level,
            links: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: FileRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.package_path = path.into();
        self
    }

    pub fn with_link(mut self, link: LinkRecord) -> Self {
        self.links.push(link);
        self
    }
}

/// A stored integrity finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub file_id: FileId,
    /// Severe element code, e.g. `P_PRES_LEVEL_CONFLICT`
    pub code: String,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_roles() {
        assert!(FileRole::DescriptorSip.is_descriptor());
        assert!(FileRole::DescriptorGfp.is_descriptor());
        assert!(!FileRole::ContentFile.is_descriptor());
        assert!(!FileRole::Schema.is_descriptor());
    }

    #[test]
    fn test_link_capable_formats() {
        assert!(FileFormat::Xml.supports_links());
        assert!(FileFormat::Pdf.supports_links());
        assert!(!FileFormat::Tiff.supports_links());
        assert!(!FileFormat::Unknown.supports_links());
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let json = r#"{
            "id": "F1",
            "format": "XML",
            "pres_level": "FULL",
            "links": [
                { "alias": "img", "status": "SUCCESSFUL", "target": "F2" },
                { "alias": "dtd", "status": "BROKEN", "rel_path": "missing.dtd" }
            ]
        }"#;
        let rec: DataFileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, FileId::from("F1"));
        assert_eq!(rec.role, FileRole::Unknown);
        assert_eq!(rec.pres_level, PresLevel::full());
        assert_eq!(rec.links.len(), 2);
        assert_eq!(rec.links[0].target, Some(FileId::from("F2")));
        assert_eq!(rec.links[1].status, LinkStatus::Broken);
        assert_eq!(rec.links[1].rel_path.as_deref(), Some("missing.dtd"));
    }

    #[test]
    fn test_pres_level_compares_case_sensitively() {
        assert_ne!(PresLevel::new("full"), PresLevel::full());
        assert_eq!(PresLevel::default().as_str(), PresLevel::UNKNOWN);
    }
}
