// src/error.rs
//! Public error types for the entire crate

use thiserror::Error;

use crate::enums::RotationPhase;
use crate::rotation::RotationRepair;

/// Why a CipherBlob could not be opened
///
/// Collapsed to "no value" at the cipher boundary; kept typed so
/// callers inside the crate (and tests) can tell a wrong key from junk.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptFailure {
    /// Not base64, or too short to hold a nonce and a tag
    #[error("blob is malformed: {0}")]
    Malformed(&'static str),

    /// Tag check failed: wrong key or tampered ciphertext
    #[error("authentication failed")]
    Authentication,

    #[error("decrypted bytes are not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("key derivation failed: {0}")]
    Derivation(String),

    /// Never says whether the password or the data is at fault
    #[error("record is unreadable with the current key")]
    Decryption(DecryptFailure),

    #[error("no master secret is active; unlock the vault first")]
    NoActiveSecret,

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<DecryptFailure> for VaultError {
    fn from(reason: DecryptFailure) -> Self {
        VaultError::Decryption(reason)
    }
}

impl From<toml::de::Error> for VaultError {
    fn from(err: toml::de::Error) -> Self {
        VaultError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;

/// Validation failures reported before any state is touched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("no master secret is active")]
    NoActiveSecret,

    #[error("current master secret does not match")]
    WrongOldSecret,

    #[error("new master secret is empty")]
    EmptyNewSecret,

    #[error("new master secret must be at least {min} characters")]
    NewSecretTooShort { min: usize },

    #[error("new master secret must differ from the current one")]
    NewSecretUnchanged,

    /// Repair found a collection rewritten with data it cannot read
    #[error("collection {collection} changed since the rotation began")]
    RecordChanged { collection: String },
}

#[derive(Error, Debug)]
pub enum RotationError {
    #[error("password change rejected: {0}")]
    Rejected(RejectReason),

    #[error("a password change is already in progress")]
    InProgress,

    /// Nothing was committed; every collection is still under the old secret
    #[error("password change failed during {phase}; vault left in previous state")]
    Failed {
        phase: RotationPhase,
        collection: Option<String>,
        #[source]
        source: VaultError,
    },

    /// Some collections may be under the new key while the old secret is active.
    /// The repair handle holds everything needed to finish the job.
    #[error(
        "password change partially failed during {phase}; retry with the repair handle or restore from backup"
    )]
    PartialFailure {
        phase: RotationPhase,
        #[source]
        source: VaultError,
        repair: Box<RotationRepair>,
    },
}

impl RotationError {
    /// True when the vault may hold records under two different keys
    pub fn is_partial(&self) -> bool {
        matches!(self, RotationError::PartialFailure { .. })
    }

    /// Take the repair handle out of a partial failure
    pub fn into_repair(self) -> Option<RotationRepair> {
        match self {
            RotationError::PartialFailure { repair, .. } => Some(*repair),
            _ => None,
        }
    }
}

impl From<RejectReason> for RotationError {
    fn from(reason: RejectReason) -> Self {
        RotationError::Rejected(reason)
    }
}
