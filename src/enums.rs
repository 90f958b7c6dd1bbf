// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the #[derive(...)] enums that represent
//! user-visible choices: record collections and rotation phases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Standard record collections kept by the dashboard
///
/// Each collection is stored as a single encrypted document per user.
/// Any other name is also accepted by the store; these are the ones
/// the dashboard ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Collection {
    /// Saved site credentials
    Credentials,
    /// Identity profiles (name, address, contact data)
    Identities,
    /// Visit history
    History,
    /// Hidden photo entries
    HiddenPhotos,
}

impl Collection {
    /// Every standard collection, in storage order
    pub const ALL: [Collection; 4] = [
        Collection::Credentials,
        Collection::Identities,
        Collection::History,
        Collection::HiddenPhotos,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Collection::Credentials => "vault_passwords",
            Collection::Identities => "vault_identities",
            Collection::History => "vault_history",
            Collection::HiddenPhotos => "vault_hidden_photos",
        }
    }
}

impl AsRef<str> for Collection {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Steps of the master-secret rotation protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationPhase {
    Validating,
    Decrypting,
    ReEncrypting,
    /// New secret installed and key cache cleared
    KeyClearing,
    Committed,
}

impl fmt::Display for RotationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RotationPhase::Validating => "validation",
            RotationPhase::Decrypting => "decryption",
            RotationPhase::ReEncrypting => "re-encryption",
            RotationPhase::KeyClearing => "key installation",
            RotationPhase::Committed => "commit",
        };
        f.write_str(name)
    }
}
