// src/rotation/protocol.rs
//! The rotation state machine
//!
//! `Validating → Decrypting → ReEncrypting → KeyClearing → Committed`.
//! A rejection or a failure before key installation leaves every collection
//! exactly as it was. The only mixed-key outcome is `PartialFailure`, which
//! carries a repair handle.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use tracing::{info, warn};

use crate::aliases::{MasterSecret, PlainText, VaultKey32};
use crate::crypto::{open, seal};
use crate::db::StoredBlob;
use crate::enums::RotationPhase;
use crate::error::{RejectReason, RotationError, VaultError};
use crate::rotation::guard::RotationGuard;
use crate::rotation::policy::SecretPolicy;
use crate::rotation::repair::{RotationRepair, StagedRecord};
use crate::secret::{copy_secret, fingerprint, secrets_match};
use crate::store::{RecordKey, RecordStore};

type Outcome<T> = std::result::Result<T, RotationError>;

/// What a committed rotation touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationReport {
    /// Collections now sealed under the new secret
    pub rotated: Vec<String>,
    /// Requested collections that had nothing stored
    pub skipped: Vec<String>,
}

pub struct MasterKeyRotation<'a> {
    store: &'a RecordStore,
    guard: &'a RotationGuard,
    policy: &'a SecretPolicy,
    gate: &'a RwLock<()>,
}

impl<'a> MasterKeyRotation<'a> {
    /// `gate` is held exclusively for the whole rotation so ordinary reads
    /// and writes never observe the window between re-encryption and install
    pub fn new(
        store: &'a RecordStore,
        guard: &'a RotationGuard,
        policy: &'a SecretPolicy,
        gate: &'a RwLock<()>,
    ) -> Self {
        Self {
            store,
            guard,
            policy,
            gate,
        }
    }

    pub fn run(
        &self,
        user: &str,
        old: &MasterSecret,
        new: MasterSecret,
        collections: &[&str],
    ) -> Outcome<RotationReport> {
        let _in_flight = self.guard.try_begin().ok_or(RotationError::InProgress)?;
        let _exclusive = self.gate.write().unwrap_or_else(PoisonError::into_inner);

        info!(user, requested = collections.len(), "master secret rotation started");

        self.validate(old, &new).inspect_err(|e| {
            warn!(user, error = %e, "master secret rotation rejected");
        })?;

        let (staged, skipped) = self.decrypt_all(user, old, collections)?;
        let repair = RotationRepair {
            user: user.to_owned(),
            old_fingerprint: fingerprint(old),
            new_secret: new,
            staged,
            skipped,
        };

        self.finish(repair)
    }

    /// Re-run re-encryption and key installation from a repair handle
    ///
    /// Collections saved again under the old secret since the partial
    /// failure are re-staged from their current blob, so the repair never
    /// writes older data over them.
    pub fn resume(&self, mut repair: RotationRepair) -> Outcome<RotationReport> {
        let _in_flight = self.guard.try_begin().ok_or(RotationError::InProgress)?;
        let _exclusive = self.gate.write().unwrap_or_else(PoisonError::into_inner);

        info!(user = %repair.user, staged = repair.len(), "resuming master secret rotation");

        let current = self
            .store
            .cipher()
            .current_secret()
            .map_err(|source| failed(RotationPhase::Validating, None, source))?
            .ok_or(RejectReason::NoActiveSecret)?;

        // Plaintexts were read under this secret; anything else means the
        // vault moved on and the buffered data may be stale
        if fingerprint(&current) != repair.old_fingerprint {
            return Err(RejectReason::WrongOldSecret.into());
        }

        self.restage_changed(&current, &mut repair)?;
        self.finish(repair)
    }

    /// Reload every staged collection; pick up writes made since staging
    fn restage_changed(&self, old: &MasterSecret, repair: &mut RotationRepair) -> Outcome<()> {
        let phase = RotationPhase::Validating;
        let old_key = self
            .store
            .cipher()
            .key_for(old)
            .map_err(|source| failed(phase, None, source))?;

        for record in &mut repair.staged {
            let changed = || RejectReason::RecordChanged {
                collection: record.key.collection().to_owned(),
            };

            let current = self
                .store
                .load_blob(&record.key)
                .map_err(|source| failed(phase, Some(record.key.collection()), source))?
                .ok_or_else(changed)?;

            if record.is_unchanged(&current) {
                continue;
            }

            let plaintext = open(&old_key, &current.blob).map_err(|reason| {
                warn!(key = %record.key, %reason, "collection rewritten with unreadable data, refusing repair");
                changed()
            })?;

            info!(key = %record.key, "collection saved again since the partial failure, re-staging");
            record.plaintext = PlainText::new(plaintext);
            record.original = current;
            record.written = None;
        }
        Ok(())
    }

    fn validate(&self, old: &MasterSecret, new: &MasterSecret) -> Outcome<()> {
        let current = self
            .store
            .cipher()
            .current_secret()
            .map_err(|source| failed(RotationPhase::Validating, None, source))?
            .ok_or(RejectReason::NoActiveSecret)?;

        if !secrets_match(old, &current) {
            return Err(RejectReason::WrongOldSecret.into());
        }

        self.policy.check(old, new)?;
        Ok(())
    }

    fn decrypt_all(
        &self,
        user: &str,
        old: &MasterSecret,
        collections: &[&str],
    ) -> Outcome<(Vec<StagedRecord>, Vec<String>)> {
        let phase = RotationPhase::Decrypting;
        let old_key = self
            .store
            .cipher()
            .key_for(old)
            .map_err(|source| failed(phase, None, source))?;

        let mut seen = HashSet::new();
        let mut staged = Vec::new();
        let mut skipped = Vec::new();

        for &name in collections {
            if !seen.insert(name) {
                continue;
            }

            let key = RecordKey::new(name, user);
            let Some(original) = self
                .store
                .load_blob(&key)
                .map_err(|source| failed(phase, Some(name), source))?
            else {
                skipped.push(name.to_owned());
                continue;
            };

            let plaintext = open(&old_key, &original.blob).map_err(|reason| {
                warn!(%key, "collection unreadable with the old key, aborting rotation");
                failed(phase, Some(name), VaultError::Decryption(reason))
            })?;

            staged.push(StagedRecord::new(key, original, PlainText::new(plaintext)));
        }

        info!(user, staged = staged.len(), skipped = skipped.len(), "collections decrypted under old key");
        Ok((staged, skipped))
    }

    fn finish(&self, mut repair: RotationRepair) -> Outcome<RotationReport> {
        let cipher = self.store.cipher();

        let phase = RotationPhase::ReEncrypting;
        let new_key = cipher
            .key_for(&repair.new_secret)
            .map_err(|source| failed(phase, None, source))?;

        let failure = repair
            .staged
            .iter_mut()
            .enumerate()
            .find_map(|(i, record)| match self.reseal(&new_key, record) {
                Ok(written) => {
                    record.written = Some(written);
                    None
                }
                Err(e) => Some((i, e)),
            });

        if let Some((written, source)) = failure {
            let collection = repair.staged[written].key.collection().to_owned();
            warn!(user = %repair.user, %collection, error = %source, "re-encryption failed, restoring previous blobs");
            return Err(self.undo(phase, Some(collection), source, written, repair));
        }

        let phase = RotationPhase::KeyClearing;
        if let Err(source) = cipher.install_secret(copy_secret(&repair.new_secret)) {
            warn!(user = %repair.user, error = %source, "installing the new secret failed, restoring previous blobs");
            let written = repair.staged.len();
            return Err(self.undo(phase, None, source, written, repair));
        }

        let report = RotationReport {
            rotated: repair.collections().map(str::to_owned).collect(),
            skipped: repair.skipped.clone(),
        };
        info!(
            user = %repair.user,
            phase = %RotationPhase::Committed,
            rotated = report.rotated.len(),
            "master secret rotation committed"
        );
        Ok(report)
    }

    /// Seal under the new key, prove it opens, then write; returns what was written
    fn reseal(&self, new_key: &VaultKey32, record: &StagedRecord) -> Result<StoredBlob, VaultError> {
        let blob = seal(new_key, record.plaintext.expose_secret())?;

        let check = PlainText::new(open(new_key, &blob)?);
        if check.expose_secret() != record.plaintext.expose_secret() {
            return Err(VaultError::Encryption(
                "re-encrypted blob did not round-trip".into(),
            ));
        }

        let stored = StoredBlob::now(blob);
        self.store.put_blob(&record.key, &stored)?;
        Ok(stored)
    }

    /// Put back the first `written` originals; decide how loud the failure is
    fn undo(
        &self,
        phase: RotationPhase,
        collection: Option<String>,
        source: VaultError,
        written: usize,
        repair: RotationRepair,
    ) -> RotationError {
        let restored = repair.staged[..written]
            .iter()
            .try_for_each(|record| self.store.put_blob(&record.key, &record.original));

        match restored {
            Ok(()) => RotationError::Failed {
                phase,
                collection,
                source,
            },
            Err(restore_err) => {
                warn!(
                    user = %repair.user,
                    error = %restore_err,
                    "could not restore previous blobs; vault holds records under two keys"
                );
                RotationError::PartialFailure {
                    phase,
                    source,
                    repair: Box::new(repair),
                }
            }
        }
    }
}

fn failed(phase: RotationPhase, collection: Option<&str>, source: VaultError) -> RotationError {
    RotationError::Failed {
        phase,
        collection: collection.map(str::to_owned),
        source,
    }
}
