// src/consts.rs
//! Shared constants: security parameters and defaults

/// PBKDF2-HMAC-SHA256 iterations used to stretch the master secret
pub const KDF_ITERATIONS: u32 = 100_000;

/// Iterations used when `skip_kdf_slowdown` is on (tests and local dev only)
pub const FAST_KDF_ITERATIONS: u32 = 1_000;

/// Derived key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Maximum number of derived keys kept in memory
pub const DEFAULT_KEY_CACHE_CAPACITY: usize = 10;

/// Application-wide KDF salt. Changing it orphans every existing blob.
pub const DEFAULT_SALT: &str = "encrypted-record-vault/static-salt/v1";

/// Shortest master secret accepted by rotation
pub const DEFAULT_MIN_SECRET_LEN: usize = 8;

/// Separator between collection name and user id in record keys
pub const RECORD_KEY_SEPARATOR: &str = "::";

/// Default SQLite file name for the record store
pub const DEFAULT_RECORD_DB_FILE: &str = "records.db";

/// Directory under the platform data dir that holds the record store
pub const APP_DIR_NAME: &str = "encrypted-record-vault";
