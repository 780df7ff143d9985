//! # Configuration Modules
//!
//! The monitors read one JSON document, `global_config.json`, holding the
//! catalog path and the default target lists.

/// Typed `global_config.json` loader.
pub mod config_monitor;

pub use config_monitor::{load_monitor_config, resolve_config_path, ConfigError, EndpointsConfig, MonitorConfig};
