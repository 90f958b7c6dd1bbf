// src/rotation/mod.rs
//! Master-secret rotation
//!
//! Validate → decrypt everything under the old key → re-encrypt under a
//! staged new key → install the new secret and clear the key cache → commit.
//! The new secret only becomes active once every affected collection has a
//! verified new-key ciphertext on disk.
mod guard;
mod policy;
mod protocol;
mod repair;

pub use guard::{InFlight, RotationGuard};
pub use policy::SecretPolicy;
pub use protocol::{MasterKeyRotation, RotationReport};
pub use repair::RotationRepair;
