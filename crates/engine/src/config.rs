//! Store configuration
//!
//! A [`StoreConfig`] names the store and says where its file lives. It can
//! be built in code or loaded from a TOML file:
//!
//! ```toml
//! name = "testdb"
//! data_dir = "./data"
//! # dir_mode = 493          # 0o755, used when data_dir is created
//! # busy_timeout_ms = 5000
//! # vacuum_on_close = true
//! ```

use crate::error::{Error, Result};
use crate::schema::validate_name;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_dir_mode() -> u32 {
    0o755
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_vacuum_on_close() -> bool {
    true
}

/// Settings for one store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store name; also the table name and the file stem
    pub name: String,
    /// Directory holding `<name>.db`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Permission bits for a newly created data directory (unix only)
    #[serde(default = "default_dir_mode")]
    pub dir_mode: u32,
    /// How long a statement waits on a locked database file
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Run VACUUM when the store is closed
    #[serde(default = "default_vacuum_on_close")]
    pub vacuum_on_close: bool,
}

impl StoreConfig {
    /// Config with default settings
    pub fn new(name: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            data_dir: data_dir.into(),
            dir_mode: default_dir_mode(),
            busy_timeout_ms: default_busy_timeout_ms(),
            vacuum_on_close: default_vacuum_on_close(),
        }
    }

    /// Path of the database file
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.db", self.name))
    }

    /// Check the store name
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }

    /// Read and parse config from a TOML file.
    ///
    /// The name is validated as part of loading.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_error = |reason: String| Error::Config {
            path: path.to_path_buf(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config: StoreConfig =
            toml::from_str(&content).map_err(|e| config_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this config to TOML and write it to `path`.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let config_error = |reason: String| Error::Config {
            path: path.to_path_buf(),
            reason,
        };
        let content = toml::to_string_pretty(self).map_err(|e| config_error(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| config_error(e.to_string()))
    }
}
