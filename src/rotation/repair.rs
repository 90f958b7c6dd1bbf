// src/rotation/repair.rs
use std::fmt;

use crate::aliases::{MasterSecret, PlainText};
use crate::db::StoredBlob;
use crate::store::RecordKey;

/// One collection buffered between decryption and re-encryption
pub(crate) struct StagedRecord {
    pub(crate) key: RecordKey,
    /// Old-key blob, written back if the rotation has to be undone
    pub(crate) original: StoredBlob,
    pub(crate) plaintext: PlainText,
    /// New-key blob this rotation wrote, once written
    pub(crate) written: Option<StoredBlob>,
}

impl StagedRecord {
    pub(crate) fn new(key: RecordKey, original: StoredBlob, plaintext: PlainText) -> Self {
        Self {
            key,
            original,
            plaintext,
            written: None,
        }
    }

    /// True when `current` is a blob this rotation knows about
    pub(crate) fn is_unchanged(&self, current: &StoredBlob) -> bool {
        *current == self.original || self.written.as_ref() == Some(current)
    }
}

/// Everything a rotation needs after the old key is no longer required
///
/// Returned inside `RotationError::PartialFailure`. Hand it to
/// `Vault::repair_rotation` to re-run re-encryption and key installation
/// from the buffered plaintexts. Plaintexts and the new secret are zeroized
/// when the handle is dropped.
pub struct RotationRepair {
    pub(crate) user: String,
    /// Digest of the secret that was active when the plaintexts were read
    pub(crate) old_fingerprint: blake3::Hash,
    pub(crate) new_secret: MasterSecret,
    pub(crate) staged: Vec<StagedRecord>,
    pub(crate) skipped: Vec<String>,
}

impl RotationRepair {
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Collections this handle will re-encrypt
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.staged.iter().map(|r| r.key.collection())
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }
}

impl fmt::Debug for RotationRepair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotationRepair")
            .field("user", &self.user)
            .field("collections", &self.collections().collect::<Vec<_>>())
            .field("new_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
