//! # Logging Setup
//!
//! Installs the global `tracing` subscriber used by the monitor binaries:
//!
//! - an `EnvFilter` taken from `RUST_LOG`, falling back to the configured
//!   level (default `info`);
//! - a coloured console layer;
//! - a JSON layer writing to a daily rolling file, through a non-blocking
//!   writer whose `WorkerGuard` must outlive the program's logging.

use std::env;
use std::io;
use std::path::PathBuf;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Directory of the rolling log files.
    pub log_dir: PathBuf,
    /// File name prefix, normally the process basename.
    pub file_prefix: String,
    /// Filter directive used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl LogOptions {
    /// Options from the environment: `LOG_DIR` (default `logs`) and
    /// `RUST_LOG` (default `info`).
    pub fn from_env(file_prefix: &str) -> Self {
        Self {
            log_dir: PathBuf::from(env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string())),
            file_prefix: file_prefix.to_string(),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
/// Fails if the log directory cannot be created, the filter directive is
/// invalid, or a global subscriber is already installed.
pub fn setup_logging(options: &LogOptions) -> io::Result<WorkerGuard> {
    std::fs::create_dir_all(&options.log_dir)?;

    let file_appender = rolling::daily(&options.log_dir, &options.file_prefix);
    let (non_blocking_appender, guard) = non_blocking(file_appender);

    let console_layer = fmt::layer().with_target(true).with_ansi(true);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_appender)
        .json();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&options.log_level))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    info!("Logging initialized with level: {}", options.log_level);
    Ok(guard)
}
