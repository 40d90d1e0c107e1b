use horizon_core::db::migrations::latest_version;
use horizon_core::db::{open_db, DbError};
use horizon_core::{KeyValueStore, KvError, SqliteKvStore};
use rusqlite::Connection;

#[test]
fn missing_key_reads_as_none() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    assert_eq!(store.get_item("goals_today").unwrap(), None);
}

#[test]
fn set_item_replaces_previous_value() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    store.set_item("goals_week", "[]").unwrap();
    store.set_item("goals_week", r#"[{"id":"1"}]"#).unwrap();

    assert_eq!(
        store.get_item("goals_week").unwrap().as_deref(),
        Some(r#"[{"id":"1"}]"#)
    );
}

#[test]
fn remove_item_is_idempotent() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    store.set_item("goals_month", "[]").unwrap();

    store.remove_item("goals_month").unwrap();
    store.remove_item("goals_month").unwrap();

    assert_eq!(store.get_item("goals_month").unwrap(), None);
}

#[test]
fn multi_remove_only_touches_listed_keys() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    for key in ["goals_today", "goals_week", "settings"] {
        store.set_item(key, "[]").unwrap();
    }

    store
        .multi_remove(&["goals_today", "goals_week", "goals_year"])
        .unwrap();

    assert_eq!(store.get_item("goals_today").unwrap(), None);
    assert_eq!(store.get_item("goals_week").unwrap(), None);
    assert_eq!(store.get_item("settings").unwrap().as_deref(), Some("[]"));
}

#[test]
fn values_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.sqlite3");

    let store = SqliteKvStore::open(&path).unwrap();
    store.set_item("goals_year", "[1]").unwrap();
    drop(store);

    let reopened = SqliteKvStore::open(&path).unwrap();
    assert_eq!(reopened.get_item("goals_year").unwrap().as_deref(), Some("[1]"));
}

#[test]
fn opening_twice_keeps_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.sqlite3");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 1);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match SqliteKvStore::open(&path) {
        Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("future schema must be rejected"),
    }
}

#[test]
fn kv_error_exposes_db_source() {
    let err = KvError::from(DbError::UnsupportedSchemaVersion {
        db_version: 2,
        latest_supported: 1,
    });
    assert!(std::error::Error::source(&err).is_some());
    assert!(err.to_string().contains("newer than supported"));
}
