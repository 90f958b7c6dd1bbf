// src/crypto/blob.rs
//! CipherBlob: the self-contained unit of storage
//!
//! Layout: `base64(nonce(12) || ciphertext || tag(16))`, standard alphabet
//! with padding.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::consts::{NONCE_LEN, TAG_LEN};
use crate::error::DecryptFailure;

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CipherBlob(String);

impl CipherBlob {
    /// Concatenate nonce and sealed bytes and encode them
    pub fn encode(nonce: &[u8; NONCE_LEN], sealed: &[u8]) -> Self {
        let mut raw = Vec::with_capacity(NONCE_LEN + sealed.len());
        raw.extend_from_slice(nonce);
        raw.extend_from_slice(sealed);
        CipherBlob(STANDARD.encode(raw))
    }

    /// Split into nonce and sealed bytes (ciphertext + tag)
    pub fn decode(&self) -> Result<([u8; NONCE_LEN], Vec<u8>), DecryptFailure> {
        let raw = STANDARD
            .decode(self.0.as_bytes())
            .map_err(|_| DecryptFailure::Malformed("invalid base64"))?;

        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(DecryptFailure::Malformed("too short"));
        }

        let (nonce, sealed) = raw.split_at(NONCE_LEN);
        let mut nonce_bytes = [0u8; NONCE_LEN];
        nonce_bytes.copy_from_slice(nonce);
        Ok((nonce_bytes, sealed.to_vec()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for CipherBlob {
    fn from(encoded: String) -> Self {
        CipherBlob(encoded)
    }
}

impl From<&str> for CipherBlob {
    fn from(encoded: &str) -> Self {
        CipherBlob(encoded.to_owned())
    }
}

impl fmt::Display for CipherBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Ciphertext is not secret, but a short prefix is all anyone needs in logs
impl fmt::Debug for CipherBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(12).collect();
        write!(f, "CipherBlob({prefix}…, {} chars)", self.0.len())
    }
}
