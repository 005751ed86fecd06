//! Package manifests: a JSON snapshot of one package's file records.
//!
//! ```json
//! {
//!   "package_id": "E20240101_AAAAAA",
//!   "files": [
//!     { "id": "F1", "format": "XML", "pres_level": "FULL",
//!       "links": [ { "alias": "img", "status": "SUCCESSFUL", "target": "F2" } ] },
//!     { "id": "F2", "format": "TIFF", "pres_level": "FULL" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StorageError;
use crate::fakes::MemoryFileStore;
use crate::schema::DataFileRecord;
use crate::storage_traits::StorageResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageManifest {
    pub package_id: String,
    #[serde(default)]
    pub files: Vec<DataFileRecord>,
}

impl PackageManifest {
    /// Parse and validate a manifest from a JSON string.
    pub fn from_json(json: &str) -> StorageResult<Self> {
        let manifest: PackageManifest = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read, parse and validate a manifest file.
    pub async fn load(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await?;
        let manifest = Self::from_json(&json)?;
        debug!(
            path = %path.display(),
            package_id = %manifest.package_id,
            files = manifest.files.len(),
            "manifest loaded"
        );
        Ok(manifest)
    }

    /// File ids must be unique within the package, and so must link aliases
    /// within a file.
    pub fn validate(&self) -> StorageResult<()> {
        if self.package_id.trim().is_empty() {
            return Err(StorageError::Manifest("package_id must not be empty".to_string()));
        }
        let mut ids = HashSet::new();
        for file in &self.files {
            if !ids.insert(&file.id) {
                return Err(StorageError::Manifest(format!(
                    "duplicate file id {}",
                    file.id
                )));
            }
            let mut aliases = HashSet::new();
            for link in &file.links {
                if !aliases.insert(link.alias.as_str()) {
                    return Err(StorageError::Manifest(format!(
                        "duplicate link alias '{}' in file {}",
                        link.alias, file.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Move the records into an in-memory file store.
    pub fn into_store(self) -> MemoryFileStore {
        MemoryFileStore::with_files(self.files)
    }
}
