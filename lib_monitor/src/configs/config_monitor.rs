use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up inside `$CONFIGS_LOCATION`.
pub const CONFIG_GLOBAL_NAME: &str = "global_config.json";
/// Fallback location relative to the working directory.
pub const CONFIG_DEFAULT_PATH: &str = "config/global_config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file {0} does not exist")]
    NotFound(PathBuf),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Overrides for the upstream base URLs. Unset entries use the production
/// services.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointsConfig {
    #[serde(default)]
    pub fund_listing_base: Option<String>,
    #[serde(default)]
    pub fund_estimate_base: Option<String>,
    #[serde(default)]
    pub quote_base: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Where the fund catalog is persisted.
    pub total_fund_path: PathBuf,
    #[serde(default)]
    pub target_fund: Vec<String>,
    #[serde(default)]
    pub target_stock: Vec<String>,
    #[serde(default)]
    pub target_index: Vec<String>,
    #[serde(default)]
    pub target_mao: Vec<String>,
    /// Retries for transient HTTP failures. `0` disables the retry middleware.
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// Picks the config file: an explicit path wins, then
/// `$CONFIGS_LOCATION/global_config.json`, then `config/global_config.json`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match env::var("CONFIGS_LOCATION") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join(CONFIG_GLOBAL_NAME),
        _ => PathBuf::from(CONFIG_DEFAULT_PATH),
    }
}

/// Reads and validates the config file at `path`.
///
/// A relative `total_fund_path` is resolved against the config file's
/// directory.
pub fn load_monitor_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: MonitorConfig =
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    if config.total_fund_path.is_relative() {
        if let Some(dir) = path.parent() {
            config.total_fund_path = dir.join(&config.total_fund_path);
        }
    }

    Ok(config)
}
