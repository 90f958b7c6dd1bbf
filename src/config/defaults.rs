// src/config/defaults.rs
use std::path::PathBuf;

use crate::config::app::{Features, Kdf, Paths, Policy};
use crate::consts::{
    APP_DIR_NAME, DEFAULT_KEY_CACHE_CAPACITY, DEFAULT_MIN_SECRET_LEN, DEFAULT_RECORD_DB_FILE,
    DEFAULT_SALT, KDF_ITERATIONS,
};

pub const DEFAULT_CONFIG_FILE: &str = "vault-config.toml";

pub fn default_kdf() -> Kdf {
    Kdf {
        iterations: KDF_ITERATIONS,
        salt: DEFAULT_SALT.into(),
        cache_capacity: DEFAULT_KEY_CACHE_CAPACITY,
    }
}

pub fn default_policy() -> Policy {
    Policy {
        min_secret_len: DEFAULT_MIN_SECRET_LEN,
    }
}

pub fn default_paths() -> Paths {
    let record_db = dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(DEFAULT_RECORD_DB_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORD_DB_FILE));

    Paths {
        record_db: record_db.to_string_lossy().into_owned(),
    }
}

pub fn default_features() -> Features {
    Features {
        skip_kdf_slowdown: false,
    }
}
