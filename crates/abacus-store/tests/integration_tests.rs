//! Integration tests for abacus-store
//!
//! These tests verify the full CRUD cycle for calculation log entries.

use abacus_domain::traits::CalcLogStore;
use abacus_domain::{EntryId, LogEntryPatch, NewLogEntry};
use abacus_store::SqliteStore;

fn new_entry(input: &str, output: &str) -> NewLogEntry {
    NewLogEntry {
        input: input.to_string(),
        output: output.to_string(),
        timestamp: None,
    }
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_create_and_list() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let created = store.create_entry(new_entry("2 + 3", "2 + 3 = 5")).unwrap();
    assert_eq!(created.input, "2 + 3");
    assert_eq!(created.output, "2 + 3 = 5");
    assert!(created.timestamp > 0, "Timestamp should default to now");

    let entries = store.list_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], created);
}

#[test]
fn test_explicit_timestamp_preserved() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let created = store
        .create_entry(NewLogEntry {
            input: "4 * 4".to_string(),
            output: "4 * 4 = 16".to_string(),
            timestamp: Some(1700000000),
        })
        .unwrap();

    assert_eq!(created.timestamp, 1700000000);
    assert_eq!(store.list_entries().unwrap()[0].timestamp, 1700000000);
}

#[test]
fn test_list_preserves_insertion_order() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    for i in 0..5 {
        store
            .create_entry(new_entry(&format!("input{}", i), &format!("output{}", i)))
            .unwrap();
    }

    let entries = store.list_entries().unwrap();
    assert_eq!(entries.len(), 5);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.input, format!("input{}", i));
    }
}

#[test]
fn test_partial_update() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let created = store
        .create_entry(NewLogEntry {
            input: "5 / 2".to_string(),
            output: "5 / 2 = 2.5".to_string(),
            timestamp: Some(1700000000),
        })
        .unwrap();

    let patch = LogEntryPatch {
        output: Some("5 / 2 = 2.5 (corrected)".to_string()),
        ..Default::default()
    };

    let updated = store.update_entry(created.id, patch).unwrap().unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.input, "5 / 2", "Unpatched field should be untouched");
    assert_eq!(updated.output, "5 / 2 = 2.5 (corrected)");
    assert_eq!(
        updated.timestamp, 1700000000,
        "Timestamp should never be regenerated on update"
    );
}

#[test]
fn test_update_timestamp_when_supplied() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let created = store
        .create_entry(NewLogEntry {
            input: "1 + 1".to_string(),
            output: "1 + 1 = 2".to_string(),
            timestamp: Some(1700000000),
        })
        .unwrap();

    let patch = LogEntryPatch {
        timestamp: Some(1800000000),
        ..Default::default()
    };

    let updated = store.update_entry(created.id, patch).unwrap().unwrap();
    assert_eq!(updated.timestamp, 1800000000);
}

#[test]
fn test_update_unknown_id_returns_none() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let patch = LogEntryPatch {
        input: Some("ghost".to_string()),
        ..Default::default()
    };

    let result = store.update_entry(EntryId::new(), patch).unwrap();
    assert!(result.is_none(), "Unknown id should not be an error");
}

#[test]
fn test_empty_patch_reports_existence() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let created = store.create_entry(new_entry("3 - 1", "3 - 1 = 2")).unwrap();

    let unchanged = store
        .update_entry(created.id, LogEntryPatch::default())
        .unwrap();
    assert_eq!(unchanged, Some(created));

    let missing = store
        .update_entry(EntryId::new(), LogEntryPatch::default())
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_delete_is_idempotent() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let created = store.create_entry(new_entry("9 % 4", "9 % 4 = 1")).unwrap();

    assert!(store.delete_entry(created.id).unwrap());
    assert!(
        !store.delete_entry(created.id).unwrap(),
        "Second delete should succeed as a no-op"
    );
    assert!(store.list_entries().unwrap().is_empty());
}

#[test]
fn test_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("abacus.db");

    let created = {
        let mut store = SqliteStore::new(&db_path).unwrap();
        store.create_entry(new_entry("6 ^ 2", "6 ^ 2 = 36")).unwrap()
    };

    let store = SqliteStore::new(&db_path).unwrap();
    let entries = store.list_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], created);
}
