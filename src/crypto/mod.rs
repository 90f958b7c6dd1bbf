// src/crypto/mod.rs
//! Pure cryptographic operations: no I/O, no database
//!
//! PBKDF2 key stretching with a bounded cache, AES-256-GCM sealing, and the
//! CipherBlob wire form.
mod blob;
mod cipher;
mod decrypt;
mod encrypt;
mod kdf;

pub use blob::CipherBlob;
pub use cipher::VaultCipher;
pub use decrypt::open;
pub use encrypt::seal;
pub use kdf::{derive_key, KeyCache};
