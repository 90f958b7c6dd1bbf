// src/db/record_db_conn.rs
use std::{fs, path::Path};

use rusqlite::{Connection, Result};

/// Open (and if needed create) the record database at `db_path`
pub fn open_record_db_at<P: AsRef<Path>>(db_path: P) -> Result<Connection> {
    if let Some(parent) = db_path.as_ref().parent() {
        let _ = fs::create_dir_all(parent);
    }

    let conn = Connection::open(db_path)?;

    conn.execute_batch(
        r#"
        PRAGMA synchronous = FULL;

        CREATE TABLE IF NOT EXISTS records (
            record_key TEXT PRIMARY KEY,
            blob       TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    Ok(conn)
}
