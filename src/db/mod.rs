// src/db/mod.rs
//! Persistence backends for encrypted records
//!
//! The store only ever needs durable single-key put/get; nothing here is
//! transactional across keys.
pub mod kv;
pub mod record_db_conn;
pub mod sqlite_kv;

pub use kv::{KvStore, MemoryKvStore, StoredBlob};
pub use record_db_conn::open_record_db_at;
pub use sqlite_kv::SqliteKvStore;
