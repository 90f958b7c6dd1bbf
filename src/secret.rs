// src/secret.rs
//! The "current master secret" slot
//!
//! Where the active secret lives is up to the embedding application; the
//! vault only needs get/set/clear on it. Comparison of secrets goes through
//! BLAKE3 digests, whose equality check is constant-time.

use std::sync::{PoisonError, RwLock};

use crate::aliases::MasterSecret;
use crate::error::Result;

pub trait SecretHolder: Send + Sync {
    /// A copy of the active secret, if one is set
    fn current(&self) -> Result<Option<MasterSecret>>;

    /// Replace the active secret wholesale
    fn install(&self, secret: MasterSecret) -> Result<()>;

    /// Forget the active secret
    fn clear(&self) -> Result<()>;
}

/// Process-local holder; the secret never leaves memory
#[derive(Default)]
pub struct InMemorySecretHolder {
    slot: RwLock<Option<MasterSecret>>,
}

impl InMemorySecretHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(secret: MasterSecret) -> Self {
        Self {
            slot: RwLock::new(Some(secret)),
        }
    }
}

impl SecretHolder for InMemorySecretHolder {
    fn current(&self) -> Result<Option<MasterSecret>> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.as_ref().map(copy_secret))
    }

    fn install(&self, secret: MasterSecret) -> Result<()> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(secret);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

pub(crate) fn copy_secret(secret: &MasterSecret) -> MasterSecret {
    MasterSecret::new(secret.expose_secret().clone())
}

/// Constant-time equality of two secrets
pub fn secrets_match(a: &MasterSecret, b: &MasterSecret) -> bool {
    fingerprint(a) == fingerprint(b)
}

/// In-memory digest of a secret; `blake3::Hash` compares in constant time
pub(crate) fn fingerprint(secret: &MasterSecret) -> blake3::Hash {
    blake3::hash(secret.expose_secret().as_bytes())
}
