//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document.  Every field is
//! optional in the file; anything omitted takes its [`SystemConfig::default`]
//! value.  The result is always validated before it is returned.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "PUMPHOUSE_CONFIG";
/// Used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "pumphouse.json";

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `PUMPHOUSE_CONFIG`, falling back to `pumphouse.json`.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::new(path)
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let config = match fs::read_to_string(&self.path) {
            Ok(text) => {
                let cfg: SystemConfig = serde_json::from_str(&text)
                    .map_err(|e| ConfigError::Corrupted(e.to_string()))?;
                info!("Config: loaded {}", self.path.display());
                cfg
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Config: {} not found, using defaults", self.path.display());
                SystemConfig::default()
            }
            Err(e) => return Err(ConfigError::IoError(e)),
        };
        config.validate()?;
        Ok(config)
    }
}
