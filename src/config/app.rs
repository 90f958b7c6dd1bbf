// src/config/app.rs
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::warn;

use super::defaults::*;
use crate::consts::FAST_KDF_ITERATIONS;
use crate::error::{Result, VaultError};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_kdf")]
    pub kdf: Kdf,
    #[serde(default = "default_policy")]
    pub policy: Policy,
    #[serde(default = "default_paths")]
    pub paths: Paths,
    #[serde(default = "default_features")]
    pub features: Features,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Kdf {
    pub iterations: u32,
    /// Application-wide salt; every blob depends on it
    pub salt: String,
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub min_secret_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub record_db: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Features {
    pub skip_kdf_slowdown: bool,
}

impl Default for Kdf {
    fn default() -> Self {
        default_kdf()
    }
}

impl Default for Policy {
    fn default() -> Self {
        default_policy()
    }
}

impl Default for Paths {
    fn default() -> Self {
        default_paths()
    }
}

impl Default for Features {
    fn default() -> Self {
        default_features()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            kdf: default_kdf(),
            policy: default_policy(),
            paths: default_paths(),
            features: default_features(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let conf: Config = toml::from_str(content)?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.kdf.iterations == 0 {
            return Err(VaultError::Config("kdf.iterations must be non-zero".into()));
        }
        if self.kdf.salt.is_empty() {
            return Err(VaultError::Config("kdf.salt must not be empty".into()));
        }
        if self.kdf.cache_capacity == 0 {
            return Err(VaultError::Config("kdf.cache_capacity must be at least 1".into()));
        }
        Ok(())
    }

    /// Iteration count actually used for derivation
    pub fn kdf_iterations(&self) -> u32 {
        if self.features.skip_kdf_slowdown {
            FAST_KDF_ITERATIONS.min(self.kdf.iterations)
        } else {
            self.kdf.iterations
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("ERV_RECORD_DB") {
            self.paths.record_db = path;
        }
        // Test mode trades KDF cost for speed
        if std::env::var("ERV_TEST_MODE").is_ok() {
            self.features.skip_kdf_slowdown = true;
        }
    }
}

/// Read the config named by `ERV_CONFIG` (or the default file), with env overrides
///
/// A missing file is not an error: built-in defaults are used.
pub fn try_load() -> Result<Config> {
    let config_path =
        std::env::var("ERV_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    let mut conf = if Path::new(&config_path).exists() {
        Config::from_file(&config_path)?
    } else {
        warn!(path = %config_path, "config file not found, using built-in defaults");
        Config::default()
    };

    conf.apply_env_overrides();
    Ok(conf)
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Global config: loaded once; an unreadable file falls back to defaults
pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        try_load().unwrap_or_else(|e| {
            warn!(error = %e, "invalid config, using built-in defaults");
            let mut conf = Config::default();
            conf.apply_env_overrides();
            conf
        })
    })
}
