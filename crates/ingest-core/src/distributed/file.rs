use std::fmt;

use ingest_state::{DataFileRecord, FileFormat, FileId, FileRole, PresLevel};

use super::link::{Link, LinkTable};
use crate::error::Result;

/// Capability of a file that can act as a node of a link graph.
///
/// Integrity checking depends only on this trait, never on concrete file
/// variants.
pub trait Distributed: fmt::Debug + Send + Sync {
    fn file_id(&self) -> &FileId;

    /// Preservation level the whole distributed object must share.
    fn pres_level(&self) -> &PresLevel;

    /// Outbound links in enumeration order.
    fn links(&self) -> &[Link];

    /// File the link `alias` resolved to during ingest, if any.
    fn target_of(&self, alias: &str) -> Option<&FileId>;

    /// Path the link `alias` was written with, if any.
    fn rel_path_of(&self, alias: &str) -> Option<&str>;

    /// Descriptors are metadata-only and exempt from level checks.
    fn is_descriptor(&self) -> bool;
}

/// Attributes every archived file has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttrs {
    pub id: FileId,
    pub package_path: String,
    pub role: FileRole,
    pub format: FileFormat,
    pub pres_level: PresLevel,
}

/// A file whose content references other files of its package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributedFile {
    attrs: FileAttrs,
    links: LinkTable,
}

impl DistributedFile {
    pub fn attrs(&self) -> &FileAttrs {
        &self.attrs
    }

    pub fn link_table(&self) -> &LinkTable {
        &self.links
    }
}

impl Distributed for DistributedFile {
    fn file_id(&self) -> &FileId {
        &self.attrs.id
    }

    fn pres_level(&self) -> &PresLevel {
        &self.attrs.pres_level
    }

    fn links(&self) -> &[Link] {
        self.links.links()
    }

    fn target_of(&self, alias: &str) -> Option<&FileId> {
        self.links.target_of(alias)
    }

    fn rel_path_of(&self, alias: &str) -> Option<&str> {
        self.links.rel_path_of(alias)
    }

    fn is_descriptor(&self) -> bool {
        self.attrs.role.is_descriptor()
    }
}

/// An archived file, as the integrity core sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataFile {
    /// No link capability (images, audio, plain text, ...).
    Opaque(FileAttrs),
    /// Can reference other files of the package.
    Distributed(DistributedFile),
}

impl DataFile {
    /// Convert a stored record.
    ///
    /// A record becomes distributed when its format can carry links or when
    /// ingest resolved links for it anyway.
    pub fn from_record(record: DataFileRecord) -> Result<Self> {
        let attrs = FileAttrs {
            id: record.id,
            package_path: record.package_path,
            role: record.role,
            format: record.format,
            pres_level: record.pres_level,
        };
        if !attrs.format.supports_links() && record.links.is_empty() {
            return Ok(DataFile::Opaque(attrs));
        }
        let links = LinkTable::from_records(&attrs.id, record.links)?;
        Ok(DataFile::Distributed(DistributedFile { attrs, links }))
    }

    pub fn attrs(&self) -> &FileAttrs {
        match self {
            DataFile::Opaque(attrs) => attrs,
            DataFile::Distributed(file) => &file.attrs,
        }
    }

    pub fn id(&self) -> &FileId {
        &self.attrs().id
    }

    pub fn pres_level(&self) -> &PresLevel {
        &self.attrs().pres_level
    }

    pub fn is_descriptor(&self) -> bool {
        self.attrs().role.is_descriptor()
    }

    pub fn as_distributed(&self) -> Option<&dyn Distributed> {
        match self {
            DataFile::Opaque(_) => None,
            DataFile::Distributed(file) => Some(file),
        }
    }

    pub fn into_distributed(self) -> Option<DistributedFile> {
        match self {
            DataFile::Opaque(_) => None,
            DataFile::Distributed(file) => Some(file),
        }
    }
}

impl TryFrom<DataFileRecord> for DataFile {
    type Error = crate::error::IngestError;

    fn try_from(record: DataFileRecord) -> Result<Self> {
        DataFile::from_record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingest_state::{LinkRecord, LinkStatus};

    #[test]
    fn test_link_capable_format_is_distributed_even_without_links() {
        let file =
            DataFile::from_record(DataFileRecord::new("F1", FileFormat::Xml, PresLevel::full()))
                .unwrap();
        let d = file.as_distributed().expect("xml is distributed");
        assert!(d.links().is_empty());
        assert_eq!(d.file_id(), &FileId::from("F1"));
    }

    #[test]
    fn test_opaque_format_without_links_is_opaque() {
        let file =
            DataFile::from_record(DataFileRecord::new("F1", FileFormat::Tiff, PresLevel::bit()))
                .unwrap();
        assert!(file.as_distributed().is_none());
        assert_eq!(file.pres_level(), &PresLevel::bit());
        assert!(file.into_distributed().is_none());
    }

    #[test]
    fn test_resolved_links_make_any_format_distributed() {
        let record = DataFileRecord::new("F1", FileFormat::Unknown, PresLevel::full())
            .with_link(LinkRecord::resolved("a", "F2"));
        let file = DataFile::from_record(record).unwrap();
        assert!(file.as_distributed().is_some());
    }

    #[test]
    fn test_descriptor_role_is_exposed_through_capability() {
        let record = DataFileRecord::new("D1", FileFormat::Xml, PresLevel::full())
            .with_role(FileRole::DescriptorSip)
            .with_link(LinkRecord::unresolved("schema", LinkStatus::Ignored));
        let file = DataFile::try_from(record).unwrap();
        assert!(file.is_descriptor());
        assert!(file.as_distributed().unwrap().is_descriptor());
    }
}
