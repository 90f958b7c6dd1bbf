// src/db/sqlite_kv.rs
//! SQLite-backed record storage
//!
//! One row per (collection, user) composite key. Each put is a single
//! UPSERT, so a crash leaves either the old or the new blob in place.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::trace;

use crate::crypto::CipherBlob;
use crate::db::kv::{KvStore, StoredBlob};
use crate::db::record_db_conn::open_record_db_at;
use crate::error::{Result, VaultError};

pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    /// Wrap an already-opened connection whose schema is in place
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Ok(Self::new(open_record_db_at(db_path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Number of stored collections across all users
    pub fn count(&self) -> Result<u64> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |r| r.get(0))?;
        Ok(n as u64)
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<StoredBlob>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT blob, updated_at FROM records WHERE record_key = ?1",
                [key],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;

        row.map(|(blob, updated_at)| {
            let updated_at = DateTime::parse_from_rfc3339(&updated_at)
                .map_err(|e| VaultError::Storage(format!("bad timestamp for {key}: {e}")))?
                .with_timezone(&Utc);
            Ok(StoredBlob {
                blob: CipherBlob::from(blob),
                updated_at,
            })
        })
        .transpose()
    }

    fn put(&self, key: &str, value: &StoredBlob) -> Result<()> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute(
            r#"
            INSERT INTO records (record_key, blob, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(record_key) DO UPDATE SET
                blob = excluded.blob,
                updated_at = excluded.updated_at
            "#,
            params![key, value.blob.as_str(), value.updated_at.to_rfc3339()],
        )?;
        trace!(key, "record blob written");
        Ok(())
    }
}
