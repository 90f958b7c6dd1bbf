// src/vault.rs
//! The vault session: the only surface collaborators talk to
//!
//! Owns the record store, the cipher, the active-secret slot and the
//! rotation guard. Ordinary operations share a read gate; rotation takes it
//! exclusively so nothing observes a half-rotated vault.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::aliases::MasterSecret;
use crate::config::Config;
use crate::crypto::{CipherBlob, KeyCache, VaultCipher};
use crate::db::{KvStore, MemoryKvStore, SqliteKvStore};
use crate::error::{Result, RotationError};
use crate::rotation::{MasterKeyRotation, RotationGuard, RotationRepair, RotationReport, SecretPolicy};
use crate::secret::SecretHolder;
use crate::store::RecordStore;

pub struct Vault {
    store: RecordStore,
    cipher: Arc<VaultCipher>,
    policy: SecretPolicy,
    rotation_guard: RotationGuard,
    gate: RwLock<()>,
}

impl Vault {
    pub fn new(kv: Arc<dyn KvStore>, secrets: Arc<dyn SecretHolder>, config: &Config) -> Result<Self> {
        config.validate()?;

        let keys = Arc::new(KeyCache::new(
            config.kdf.cache_capacity,
            config.kdf_iterations(),
        ));
        let cipher = Arc::new(VaultCipher::new(
            keys,
            secrets,
            config.kdf.salt.as_bytes(),
        ));

        Ok(Self {
            store: RecordStore::new(kv, Arc::clone(&cipher)),
            cipher,
            policy: SecretPolicy::new(config.policy.min_secret_len),
            rotation_guard: RotationGuard::new(),
            gate: RwLock::new(()),
        })
    }

    /// Vault over the SQLite file named in `config.paths.record_db`
    pub fn open(config: &Config, secrets: Arc<dyn SecretHolder>) -> Result<Self> {
        Self::open_at(&config.paths.record_db, config, secrets)
    }

    pub fn open_at<P: AsRef<Path>>(
        db_path: P,
        config: &Config,
        secrets: Arc<dyn SecretHolder>,
    ) -> Result<Self> {
        let kv = Arc::new(SqliteKvStore::open(db_path)?);
        Self::new(kv, secrets, config)
    }

    /// Vault whose records vanish with the process
    pub fn in_memory(config: &Config, secrets: Arc<dyn SecretHolder>) -> Result<Self> {
        Self::new(Arc::new(MemoryKvStore::new()), secrets, config)
    }

    /// Make `secret` the active master secret (first unlock or switch)
    ///
    /// No check is made against stored data: a wrong secret simply makes
    /// every collection read back as its default.
    pub fn set_active_secret(&self, secret: &str) -> Result<()> {
        let _gate = self.read_gate();
        self.cipher
            .install_secret(MasterSecret::new(secret.to_owned()))?;
        info!("active master secret replaced");
        Ok(())
    }

    /// Forget the active secret and every derived key
    pub fn lock(&self) -> Result<()> {
        let _gate = self.read_gate();
        self.cipher.clear_secret()?;
        info!("vault locked");
        Ok(())
    }

    pub fn is_unlocked(&self) -> Result<bool> {
        self.cipher.is_unlocked()
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<CipherBlob> {
        let _gate = self.read_gate();
        self.cipher.encrypt(plaintext)
    }

    /// `Ok(None)` when the blob does not open under the active secret
    pub fn decrypt(&self, blob: &CipherBlob) -> Result<Option<String>> {
        let _gate = self.read_gate();
        self.cipher.decrypt(blob)
    }

    pub fn get_collection<T>(&self, name: &str, user_id: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let _gate = self.read_gate();
        self.store.get(name, user_id)
    }

    pub fn get_collection_or<T>(&self, name: &str, user_id: &str, default: T) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let _gate = self.read_gate();
        self.store.get_or(name, user_id, default)
    }

    pub fn save_collection<T>(&self, name: &str, user_id: &str, collection: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let _gate = self.read_gate();
        self.store.save(name, user_id, collection)
    }

    /// Replace the master secret and re-encrypt `collections` of `user_id`
    pub fn rotate_master_secret(
        &self,
        user_id: &str,
        old: &str,
        new: &str,
        collections: &[&str],
    ) -> std::result::Result<RotationReport, RotationError> {
        let old = MasterSecret::new(old.to_owned());
        let new = MasterSecret::new(new.to_owned());
        self.rotation().run(user_id, &old, new, collections)
    }

    /// Finish a rotation that ended in `RotationError::PartialFailure`
    pub fn repair_rotation(
        &self,
        repair: RotationRepair,
    ) -> std::result::Result<RotationReport, RotationError> {
        self.rotation().resume(repair)
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation_guard.is_busy()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn key_cache(&self) -> &KeyCache {
        self.cipher.key_cache()
    }

    pub fn rotation_guard(&self) -> &RotationGuard {
        &self.rotation_guard
    }

    fn rotation(&self) -> MasterKeyRotation<'_> {
        MasterKeyRotation::new(&self.store, &self.rotation_guard, &self.policy, &self.gate)
    }

    fn read_gate(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().unwrap_or_else(PoisonError::into_inner)
    }
}
