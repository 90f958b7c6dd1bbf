// src/crypto/decrypt.rs
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::aliases::VaultKey32;
use crate::crypto::blob::CipherBlob;
use crate::error::DecryptFailure;

/// Decrypt a CipherBlob → plaintext under an explicit key
pub fn open(key: &VaultKey32, blob: &CipherBlob) -> Result<String, DecryptFailure> {
    let (nonce, sealed) = blob.decode()?;

    // A 32-byte key always fits; treat the impossible case as a bad key
    let cipher = Aes256Gcm::new_from_slice(key.expose_secret())
        .map_err(|_| DecryptFailure::Authentication)?;

    let plain = cipher
        .decrypt(Nonce::from_slice(&nonce), sealed.as_slice())
        .map_err(|_| DecryptFailure::Authentication)?;

    String::from_utf8(plain).map_err(|_| DecryptFailure::InvalidUtf8)
}
