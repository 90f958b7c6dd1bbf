// src/crypto/cipher.rs
//! Authenticated Encryption Service
//!
//! Binds the key cache, the active-secret slot and the deployment salt.
//! Callers hand it strings and blobs; keys never leave this module except
//! as shared references for the rotation protocol.

use std::sync::Arc;

use tracing::debug;

use crate::aliases::{MasterSecret, VaultKey32};
use crate::crypto::blob::CipherBlob;
use crate::crypto::decrypt::open;
use crate::crypto::encrypt::seal;
use crate::crypto::kdf::KeyCache;
use crate::error::{Result, VaultError};
use crate::secret::SecretHolder;

pub struct VaultCipher {
    keys: Arc<KeyCache>,
    secrets: Arc<dyn SecretHolder>,
    salt: Vec<u8>,
}

impl VaultCipher {
    pub fn new(keys: Arc<KeyCache>, secrets: Arc<dyn SecretHolder>, salt: impl Into<Vec<u8>>) -> Self {
        Self {
            keys,
            secrets,
            salt: salt.into(),
        }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<CipherBlob> {
        let key = self.active_key()?;
        seal(&key, plaintext)
    }

    /// Decrypt under the active secret; any decryption failure is `None`
    ///
    /// Derivation failures and a locked vault are still errors.
    pub fn decrypt(&self, blob: &CipherBlob) -> Result<Option<String>> {
        match self.try_decrypt(blob) {
            Ok(plain) => Ok(Some(plain)),
            Err(VaultError::Decryption(reason)) => {
                debug!(%reason, "blob unreadable with the active key");
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    /// Like `decrypt`, but keeps the reason a blob could not be opened
    pub fn try_decrypt(&self, blob: &CipherBlob) -> Result<String> {
        let key = self.active_key()?;
        Ok(open(&key, blob)?)
    }

    pub fn current_secret(&self) -> Result<Option<MasterSecret>> {
        self.secrets.current()
    }

    pub fn is_unlocked(&self) -> Result<bool> {
        Ok(self.secrets.current()?.is_some())
    }

    /// Make `secret` the active one and drop every cached key
    pub fn install_secret(&self, secret: MasterSecret) -> Result<()> {
        self.secrets.install(secret)?;
        self.keys.clear();
        Ok(())
    }

    pub fn clear_secret(&self) -> Result<()> {
        self.secrets.clear()?;
        self.keys.clear();
        Ok(())
    }

    /// Key for an explicit secret, without touching the active slot
    pub fn key_for(&self, secret: &MasterSecret) -> Result<Arc<VaultKey32>> {
        self.keys.derive(secret, &self.salt)
    }

    pub fn key_cache(&self) -> &KeyCache {
        &self.keys
    }

    fn active_key(&self) -> Result<Arc<VaultKey32>> {
        let secret = self.secrets.current()?.ok_or(VaultError::NoActiveSecret)?;
        self.key_for(&secret)
    }
}
