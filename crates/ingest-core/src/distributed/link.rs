use std::collections::HashMap;

use ingest_state::{FileId, LinkRecord, LinkStatus};

use crate::error::{IngestError, Result};

/// A typed link out of a distributed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    alias: String,
    status: LinkStatus,
    rel_path: Option<String>,
}

impl Link {
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn rel_path(&self) -> Option<&str> {
        self.rel_path.as_deref()
    }

    /// Whether integrity checking looks at this link at all. Broken and
    /// ignored links were reported by link resolution.
    pub fn in_scope(&self) -> bool {
        !self.status.is_settled_failure()
    }
}

/// Links of one file, in enumeration order, with the alias → target mapping
/// derived from resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable {
    links: Vec<Link>,
    index: HashMap<String, usize>,
    targets: HashMap<String, FileId>,
}

impl LinkTable {
    /// Build a table from stored link records of `owner`.
    ///
    /// Aliases must be unique; a repeated alias means the stored links are
    /// inconsistent and is reported as [`IngestError::InvalidRecord`].
    pub fn from_records(owner: &FileId, records: Vec<LinkRecord>) -> Result<Self> {
        let mut table = LinkTable::default();
        for record in records {
            if table.index.contains_key(&record.alias) {
                return Err(IngestError::InvalidRecord {
                    file_id: owner.0.clone(),
                    reason: format!("duplicate link alias '{}'", record.alias),
                });
            }
            table
                .index
                .insert(record.alias.clone(), table.links.len());
            if let Some(target) = record.target {
                table.targets.insert(record.alias.clone(), target);
            }
            table.links.push(Link {
                alias: record.alias,
                status: record.status,
                rel_path: record.rel_path,
            });
        }
        Ok(table)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn target_of(&self, alias: &str) -> Option<&FileId> {
        self.targets.get(alias)
    }

    pub fn rel_path_of(&self, alias: &str) -> Option<&str> {
        self.index
            .get(alias)
            .and_then(|&i| self.links[i].rel_path())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
