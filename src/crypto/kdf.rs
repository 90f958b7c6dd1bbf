// src/crypto/kdf.rs
//! Key Derivation Cache
//!
//! Stretches the master secret with PBKDF2-HMAC-SHA256 and memoizes the
//! result in a bounded, insertion-ordered cache. Eviction is strictly
//! oldest-inserted first; a hit does not move an entry.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use hmac::Hmac;
use sha2::Sha256;
use tracing::{debug, trace};

use crate::aliases::{MasterSecret, VaultKey32};
use crate::consts::KEY_LEN;
use crate::error::{Result, VaultError};

/// Opaque cache key: BLAKE3 of the length-prefixed secret followed by the salt
type CacheKey = blake3::Hash;

fn cache_key(secret: &MasterSecret, salt: &[u8]) -> CacheKey {
    let secret = secret.expose_secret().as_bytes();
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(secret.len() as u64).to_le_bytes());
    hasher.update(secret);
    hasher.update(salt);
    hasher.finalize()
}

/// Run PBKDF2-HMAC-SHA256 with no caching
pub fn derive_key(secret: &MasterSecret, salt: &[u8], iterations: u32) -> Result<VaultKey32> {
    if iterations == 0 {
        return Err(VaultError::Derivation("iteration count must be non-zero".into()));
    }
    if salt.is_empty() {
        return Err(VaultError::Derivation("salt must not be empty".into()));
    }

    let mut out = [0u8; KEY_LEN];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(
        secret.expose_secret().as_bytes(),
        salt,
        iterations,
        &mut out,
    )
    .map_err(|e| VaultError::Derivation(e.to_string()))?;

    Ok(VaultKey32::new(out))
}

#[derive(Default)]
struct CacheState {
    keys: HashMap<CacheKey, Arc<VaultKey32>>,
    order: VecDeque<CacheKey>,
}

pub struct KeyCache {
    state: Mutex<CacheState>,
    capacity: usize,
    iterations: u32,
}

impl KeyCache {
    pub fn new(capacity: usize, iterations: u32) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            capacity: capacity.max(1),
            iterations,
        }
    }

    /// Return the key for `(secret, salt)`, deriving it on a miss
    pub fn derive(&self, secret: &MasterSecret, salt: &[u8]) -> Result<Arc<VaultKey32>> {
        let id = cache_key(secret, salt);

        if let Some(key) = self.lock().keys.get(&id) {
            trace!("key cache hit");
            return Ok(Arc::clone(key));
        }

        // The slow part runs outside the lock
        let key = Arc::new(derive_key(secret, salt, self.iterations)?);

        let mut state = self.lock();
        if let Some(existing) = state.keys.get(&id) {
            return Ok(Arc::clone(existing));
        }
        if state.order.len() >= self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.keys.remove(&oldest);
                debug!(capacity = self.capacity, "key cache full, evicted oldest key");
            }
        }
        state.order.push_back(id);
        state.keys.insert(id, Arc::clone(&key));
        Ok(key)
    }

    /// Drop every cached key
    pub fn clear(&self) {
        let mut state = self.lock();
        let dropped = state.order.len();
        state.keys.clear();
        state.order.clear();
        debug!(dropped, "key cache cleared");
    }

    pub fn contains(&self, secret: &MasterSecret, salt: &[u8]) -> bool {
        self.lock().keys.contains_key(&cache_key(secret, salt))
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
