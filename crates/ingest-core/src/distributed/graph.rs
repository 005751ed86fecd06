use std::sync::Arc;

use ingest_state::{FileId, FileStore, StorageError};
use tracing::trace;

use super::file::DataFile;
use crate::error::Result;

/// Resolves file ids to domain files through a [`FileStore`].
#[derive(Clone)]
pub struct FileGraph {
    store: Arc<dyn FileStore>,
}

impl FileGraph {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// Load the file with `id`.
    ///
    /// Returns `Ok(None)` when the store has no such file. Any other storage
    /// failure is an error.
    pub async fn load(&self, id: &FileId) -> Result<Option<DataFile>> {
        match self.store.get_file(id).await {
            Ok(record) => Ok(Some(DataFile::from_record(record)?)),
            Err(StorageError::FileNotFound { .. }) => {
                trace!(file_id = %id, "link target not in store");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Every file of the package, converted.
    pub async fn load_all(&self) -> Result<Vec<DataFile>> {
        self.store
            .list_files()
            .await?
            .into_iter()
            .map(DataFile::from_record)
            .collect()
    }
}

impl std::fmt::Debug for FileGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileGraph").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingest_state::fakes::MemoryFileStore;
    use ingest_state::{DataFileRecord, FileFormat, PresLevel};

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let graph = FileGraph::new(Arc::new(MemoryFileStore::new()));
        assert!(graph.load(&FileId::from("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_all_converts_every_record() {
        let store = MemoryFileStore::with_files([
            DataFileRecord::new("A", FileFormat::Xml, PresLevel::full()),
            DataFileRecord::new("B", FileFormat::Tiff, PresLevel::full()),
        ]);
        let graph = FileGraph::new(Arc::new(store));
        let files = graph.load_all().await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files.iter().filter(|f| f.as_distributed().is_some()).count(), 1);
    }
}
