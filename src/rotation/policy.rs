// src/rotation/policy.rs
use crate::aliases::MasterSecret;
use crate::consts::DEFAULT_MIN_SECRET_LEN;
use crate::error::RejectReason;
use crate::secret::secrets_match;

/// Rules a replacement master secret has to satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretPolicy {
    min_len: usize,
}

impl SecretPolicy {
    pub fn new(min_len: usize) -> Self {
        Self { min_len }
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn check(&self, old: &MasterSecret, new: &MasterSecret) -> Result<(), RejectReason> {
        let candidate = new.expose_secret();
        if candidate.is_empty() {
            return Err(RejectReason::EmptyNewSecret);
        }
        if candidate.chars().count() < self.min_len {
            return Err(RejectReason::NewSecretTooShort { min: self.min_len });
        }
        if secrets_match(old, new) {
            return Err(RejectReason::NewSecretUnchanged);
        }
        Ok(())
    }
}

impl Default for SecretPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SECRET_LEN)
    }
}
