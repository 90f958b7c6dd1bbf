// src/store.rs
//! Secure Record Store
//!
//! One encrypted JSON document per (collection, user). Reads never fail on
//! a missing or unreadable blob: the caller's default comes back instead,
//! which is how a wrong active secret presents itself.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::consts::RECORD_KEY_SEPARATOR;
use crate::crypto::VaultCipher;
use crate::db::{KvStore, StoredBlob};
use crate::error::Result;

/// Composite storage key for one collection of one user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    collection: String,
    user: String,
}

impl RecordKey {
    pub fn new(collection: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            user: user.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Composite key as stored; injective over (collection, user)
    ///
    /// `\` and `:` inside either part are backslash-escaped, so the only
    /// unescaped separator is the one between the two parts. Names without
    /// those characters are stored as-is.
    pub fn storage_key(&self) -> String {
        format!(
            "{}{RECORD_KEY_SEPARATOR}{}",
            escape_part(&self.collection),
            escape_part(&self.user)
        )
    }
}

fn escape_part(part: &str) -> Cow<'_, str> {
    if !part.contains(['\\', ':']) {
        return Cow::Borrowed(part);
    }
    let mut out = String::with_capacity(part.len() + 4);
    for ch in part.chars() {
        if matches!(ch, '\\' | ':') {
            out.push('\\');
        }
        out.push(ch);
    }
    Cow::Owned(out)
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

pub struct RecordStore {
    kv: Arc<dyn KvStore>,
    cipher: Arc<VaultCipher>,
}

impl RecordStore {
    pub fn new(kv: Arc<dyn KvStore>, cipher: Arc<VaultCipher>) -> Self {
        Self { kv, cipher }
    }

    /// Decoded collection, or `T::default()` when absent or unreadable
    pub fn get<T>(&self, collection: &str, user: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        self.get_or(collection, user, T::default())
    }

    /// Decoded collection, or `default` when absent or unreadable
    pub fn get_or<T>(&self, collection: &str, user: &str, default: T) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let key = RecordKey::new(collection, user);
        let Some(stored) = self.load_blob(&key)? else {
            debug!(%key, "no stored blob, using default");
            return Ok(default);
        };

        let Some(json) = self.cipher.decrypt(&stored.blob)? else {
            warn!(%key, "record is unreadable with the current key, using default");
            return Ok(default);
        };

        match serde_json::from_str(&json) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(%key, line = e.line(), column = e.column(), "stored document does not match the requested shape, using default");
                Ok(default)
            }
        }
    }

    /// Serialize, encrypt and persist a whole collection
    pub fn save<T>(&self, collection: &str, user: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = RecordKey::new(collection, user);
        let json = serde_json::to_string(value)?;
        let blob = self.cipher.encrypt(&json)?;
        self.put_blob(&key, &StoredBlob::now(blob))?;
        debug!(%key, "collection saved");
        Ok(())
    }

    pub fn load_blob(&self, key: &RecordKey) -> Result<Option<StoredBlob>> {
        self.kv.get(&key.storage_key())
    }

    pub fn put_blob(&self, key: &RecordKey, stored: &StoredBlob) -> Result<()> {
        self.kv.put(&key.storage_key(), stored)
    }

    pub fn cipher(&self) -> &VaultCipher {
        &self.cipher
    }
}
