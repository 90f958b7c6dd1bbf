// src/lib.rs
//! encrypted-record-vault: client-side encrypted record vault engine
//!
//! Features:
//! - PBKDF2-HMAC-SHA256 master-secret stretching with a bounded key cache
//! - AES-256-GCM CipherBlobs (nonce ‖ ciphertext, base64)
//! - One encrypted JSON document per (collection, user)
//! - Master-secret rotation that only installs the new secret once every
//!   collection has a verified new-key ciphertext
//! - Full secure-gate integration for keys, secrets and plaintext buffers

pub mod aliases;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod db;
pub mod enums;
pub mod records;
pub mod rotation;
pub mod secret;
pub mod store;
pub mod vault;

pub mod error;

// Re-export everything users need at the crate root
pub use aliases::{MasterSecret, PlainText, VaultKey32};
pub use config::load as load_config;
pub use config::Config;
pub use crypto::CipherBlob;
pub use db::{KvStore, MemoryKvStore, SqliteKvStore, StoredBlob};
pub use enums::{Collection, RotationPhase};
pub use error::{DecryptFailure, RejectReason, Result, RotationError, VaultError};
pub use rotation::{RotationRepair, RotationReport};
pub use secret::{InMemorySecretHolder, SecretHolder};
pub use store::{RecordKey, RecordStore};
pub use vault::Vault;
