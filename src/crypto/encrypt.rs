// src/crypto/encrypt.rs
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;

use crate::aliases::VaultKey32;
use crate::consts::NONCE_LEN;
use crate::crypto::blob::CipherBlob;
use crate::error::{Result, VaultError};

/// Encrypt plaintext → CipherBlob under an explicit key
///
/// A fresh random nonce is drawn for every call.
pub fn seal(key: &VaultKey32, plaintext: &str) -> Result<CipherBlob> {
    let cipher = Aes256Gcm::new_from_slice(key.expose_secret())
        .map_err(|e| VaultError::Encryption(e.to_string()))?;

    let mut nonce = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);

    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| VaultError::Encryption(e.to_string()))?;

    Ok(CipherBlob::encode(&nonce, &sealed))
}
