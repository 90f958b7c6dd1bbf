// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret types used throughout encrypted-record-vault.

pub use secure_gate::{dynamic_alias, fixed_alias};

// Fixed-size secrets
fixed_alias!(VaultKey32, 32); // 256-bit AES-GCM key derived from the master secret

// Dynamic secrets
dynamic_alias!(MasterSecret, String); // The user's master password
dynamic_alias!(PlainText, String); // Decrypted collection document, held only in memory
