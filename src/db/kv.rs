// src/db/kv.rs
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::CipherBlob;
use crate::error::Result;

/// One persisted collection: the sealed document plus its last write time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    pub blob: CipherBlob,
    pub updated_at: DateTime<Utc>,
}

impl StoredBlob {
    pub fn now(blob: CipherBlob) -> Self {
        Self {
            blob,
            updated_at: Utc::now(),
        }
    }
}

/// Durable single-key storage used by the record store
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<StoredBlob>>;
    fn put(&self, key: &str, value: &StoredBlob) -> Result<()>;
}

/// Map-backed store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, StoredBlob>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<StoredBlob>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &StoredBlob) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.clone());
        Ok(())
    }
}
