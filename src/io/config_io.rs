use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ops::history::MAX_HISTORY;

/// Optional config file name, looked up in the data directory
pub const CONFIG_FILE: &str = "clashdash.toml";

/// Default name of the durable data slot
pub const DEFAULT_DATA_FILE: &str = "clash-dashboard-data.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse clashdash.toml: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration from clashdash.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// File name of the durable slot, relative to the data directory
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Bound on retained undo/redo snapshots
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

fn default_history_limit() -> usize {
    MAX_HISTORY
}

impl Default for Config {
    fn default() -> Config {
        Config {
            data_file: default_data_file(),
            history_limit: default_history_limit(),
        }
    }
}

/// Read the config from the data directory. A missing file yields the
/// defaults; a malformed file is an error.
pub fn read_config(dir: &Path) -> Result<Config, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}
