// tests/db_tests.rs
//! SQLite persistence of sealed records

mod common;
mod support;

use std::sync::Arc;

use encrypted_record_vault::db::open_record_db_at;
use encrypted_record_vault::records::{IdentityEntry, Identities};
use encrypted_record_vault::{
    CipherBlob, Collection, InMemorySecretHolder, KvStore, SqliteKvStore, StoredBlob, Vault,
};
use support::test_config;
use tempfile::tempdir;

fn identity(label: &str) -> IdentityEntry {
    IdentityEntry {
        id: format!("id-{label}"),
        label: label.into(),
        full_name: "Alice Example".into(),
        email: Some("alice@example.org".into()),
        phone: None,
        address: None,
    }
}

#[test]
fn records_survive_reopening_the_database() {
    common::setup();
    let dir = tempdir().unwrap();
    let db = dir.path().join("records.db");
    let name = Collection::Identities.as_str();
    let config = test_config();

    {
        let vault = Vault::open_at(&db, &config, Arc::new(InMemorySecretHolder::new())).unwrap();
        vault.set_active_secret("correct horse").unwrap();
        vault
            .save_collection(name, "alice", &vec![identity("home")])
            .unwrap();
    }

    let vault = Vault::open_at(&db, &config, Arc::new(InMemorySecretHolder::new())).unwrap();
    vault.set_active_secret("correct horse").unwrap();
    let back: Identities = vault.get_collection(name, "alice").unwrap();
    assert_eq!(back, vec![identity("home")]);
}

#[test]
fn put_overwrites_and_get_round_trips_timestamp() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    assert!(store.get("missing").unwrap().is_none());

    let first = StoredBlob::now(CipherBlob::from("AAAA"));
    store.put("k", &first).unwrap();
    assert_eq!(store.get("k").unwrap(), Some(first));

    let second = StoredBlob::now(CipherBlob::from("BBBB"));
    store.put("k", &second).unwrap();
    assert_eq!(store.get("k").unwrap(), Some(second));
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn opening_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("nested").join("deeper").join("records.db");

    let conn = open_record_db_at(&db).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'records'",
            [],
            |row| row.get(0),
        )
        .unwrap();

    assert_eq!(tables, 1);
    assert!(db.exists());
}

#[test]
fn database_holds_no_plaintext() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("records.db");
    let config = test_config();

    let vault = Vault::open_at(&db, &config, Arc::new(InMemorySecretHolder::new())).unwrap();
    vault.set_active_secret("correct horse").unwrap();
    vault
        .save_collection("notes", "alice", &vec!["top secret note".to_string()])
        .unwrap();
    drop(vault);

    let conn = open_record_db_at(&db).unwrap();
    let blob: String = conn
        .query_row(
            "SELECT blob FROM records WHERE record_key = ?1",
            ["notes::alice"],
            |row| row.get(0),
        )
        .unwrap();
    assert!(!blob.contains("top secret"));
}
