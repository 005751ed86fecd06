//! Trait contract tests for FileStore and ConflictRecorder.
//!
//! These tests verify the behavioral contracts of the storage traits
//! using in-memory fakes. Any conforming implementation must pass these.

use std::sync::Arc;

use ingest_state::fakes::{MemoryConflictRecorder, MemoryFileStore};
use ingest_state::storage_traits::*;
use ingest_state::{
    DataFileRecord, FileFormat, FileId, FileRole, LinkRecord, LinkStatus, PresLevel, StorageError,
};

fn xml(id: &str) -> DataFileRecord {
    DataFileRecord::new(id, FileFormat::Xml, PresLevel::full())
}

// ===========================================================================
// FileStore contract tests
// ===========================================================================

#[tokio::test]
async fn store_get_returns_inserted_record() {
    let store = MemoryFileStore::new();
    let record = xml("F1").with_link(LinkRecord::resolved("img", "F2"));
    store.insert(record.clone()).unwrap();

    let loaded = store.get_file(&FileId::from("F1")).await.unwrap();
    assert_eq!(loaded, record);
}

#[tokio::test]
async fn store_get_missing_is_not_found() {
    let store = MemoryFileStore::new();
    let err = store.get_file(&FileId::from("nope")).await.unwrap_err();

    assert!(matches!(err, StorageError::FileNotFound { ref file_id } if file_id == "nope"));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn store_preserves_link_order() {
    let record = xml("F1")
        .with_link(LinkRecord::resolved("z", "F9"))
        .with_link(LinkRecord::unresolved("a", LinkStatus::Broken))
        .with_link(LinkRecord::resolved("m", "F5"));
    let store = MemoryFileStore::with_files([record]);

    let loaded = store.get_file(&FileId::from("F1")).await.unwrap();
    let aliases: Vec<&str> = loaded.links.iter().map(|l| l.alias.as_str()).collect();
    assert_eq!(aliases, vec!["z", "a", "m"]);
}

#[tokio::test]
async fn store_list_returns_every_record() {
    let store = MemoryFileStore::with_files([
        xml("F2"),
        xml("F1"),
        DataFileRecord::new("F3", FileFormat::Tiff, PresLevel::bit()),
    ]);

    let ids: Vec<String> = store
        .list_files()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id.0)
        .collect();
    assert_eq!(ids, vec!["F1", "F2", "F3"]);
}

#[tokio::test]
async fn store_counts_reads_including_misses() {
    let store = MemoryFileStore::with_files([xml("F1")]);
    let f1 = FileId::from("F1");
    let ghost = FileId::from("ghost");

    store.get_file(&f1).await.unwrap();
    store.get_file(&f1).await.unwrap();
    let _ = store.get_file(&ghost).await;

    assert_eq!(store.reads_of(&f1), 2);
    assert_eq!(store.reads_of(&ghost), 1);
    assert_eq!(store.reads_of(&FileId::from("never")), 0);
}

#[tokio::test]
async fn store_insert_replaces_existing() {
    let store = MemoryFileStore::with_files([xml("F1")]);
    store
        .insert(xml("F1").with_role(FileRole::DescriptorSip))
        .unwrap();

    let loaded = store.get_file(&FileId::from("F1")).await.unwrap();
    assert_eq!(loaded.role, FileRole::DescriptorSip);
    assert_eq!(store.len(), 1);
}

// ===========================================================================
// ConflictRecorder contract tests
// ===========================================================================

#[tokio::test]
async fn recorder_stores_and_returns_conflict() {
    let recorder = MemoryConflictRecorder::new();
    let f1 = FileId::from("F1");

    let record = recorder
        .record_conflict(&f1, "P_PRES_LEVEL_CONFLICT")
        .await
        .unwrap();
    assert_eq!(record.file_id, f1);
    assert_eq!(record.code, "P_PRES_LEVEL_CONFLICT");

    let stored = recorder.conflicts_for(&f1).await.unwrap();
    assert_eq!(stored, vec![record]);
}

#[tokio::test]
async fn recorder_rejects_duplicate_key() {
    let recorder = MemoryConflictRecorder::new();
    let f1 = FileId::from("F1");
    recorder.record_conflict(&f1, "P_X").await.unwrap();

    let err = recorder.record_conflict(&f1, "P_X").await.unwrap_err();
    assert!(matches!(err, StorageError::DuplicateConflict { .. }));
    assert_eq!(recorder.list_conflicts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn recorder_allows_same_code_on_different_files() {
    let recorder = MemoryConflictRecorder::new();
    recorder
        .record_conflict(&FileId::from("F1"), "P_X")
        .await
        .unwrap();
    recorder
        .record_conflict(&FileId::from("F2"), "P_X")
        .await
        .unwrap();

    assert_eq!(recorder.list_conflicts().await.unwrap().len(), 2);
    assert!(recorder
        .conflicts_for(&FileId::from("F3"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn recorder_list_keeps_insertion_order() {
    let recorder = MemoryConflictRecorder::new();
    for id in ["F3", "F1", "F2"] {
        recorder
            .record_conflict(&FileId::from(id), "P_X")
            .await
            .unwrap();
    }
    let ids: Vec<String> = recorder
        .list_conflicts()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.file_id.0)
        .collect();
    assert_eq!(ids, vec!["F3", "F1", "F2"]);
}

#[tokio::test]
async fn failing_recorder_surfaces_backend_error() {
    let recorder = MemoryConflictRecorder::failing();
    let err = recorder
        .record_conflict(&FileId::from("F1"), "P_X")
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Backend(_)));
    assert_eq!(recorder.write_attempts(), 1);
    assert!(recorder.list_conflicts().await.unwrap().is_empty());
}

#[tokio::test]
async fn recorder_serializes_concurrent_writers() {
    let recorder = Arc::new(MemoryConflictRecorder::new());
    let mut handles = Vec::new();
    for i in 0..16 {
        let recorder = Arc::clone(&recorder);
        handles.push(tokio::spawn(async move {
            recorder
                .record_conflict(&FileId::new(format!("F{i}")), "P_X")
                .await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    assert_eq!(recorder.list_conflicts().await.unwrap().len(), 16);
    assert_eq!(recorder.write_attempts(), 16);
}
