// src/config/mod.rs
//! Configuration system for encrypted-record-vault
//!
//! Central, lazy-loaded global config with TOML + env overrides.

pub use app::{load, try_load, Config, Features, Kdf, Paths, Policy};

mod app;
mod defaults;
