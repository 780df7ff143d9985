use std::path::{Path, PathBuf};
use std::{env, fmt};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use sysinfo::System;
use thiserror::Error;

#[derive(Debug, Error)]
/// # Process Info Error
///
/// Errors raised while describing the current process.
pub enum ProcessInfoError {
    /// An I/O error occurred, typically when resolving the executable.
    #[error("I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    /// The executable path has no usable file name or parent directory.
    #[error("Unusable executable path: {0}")]
    ExePath(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// # Process Information
///
/// Who and where the running monitor is.
pub struct ProcessInfo {
    /// The full path to the current executable.
    pub process_current_exe: String,
    /// The base name of the executable (filename without extension).
    pub process_basename: String,
    /// The directory where the executable is located.
    pub process_location: String,
    /// The process ID (PID) of the current process.
    pub process_pid: i64,
    /// The hostname of the machine running the process.
    pub process_host: String,
}

impl fmt::Display for ProcessInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProcessInfo
    Current exe: {},
    Basename: {},
    Location: {},
    Pid: {},
    Host: {}
",
            self.process_current_exe,
            self.process_basename,
            self.process_location,
            self.process_pid,
            self.process_host,
        )
    }
}

/// # Get Process Information
///
/// Collects executable path, basename, directory, pid and hostname. An
/// unreadable hostname is reported as `unknown` rather than failing.
pub fn get_process_info() -> Result<ProcessInfo, ProcessInfoError> {
    let current_exe: PathBuf = env::current_exe()?;
    let basename = get_process_basename(&current_exe)?;
    let location = get_process_location(&current_exe)?;
    let host = hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());

    Ok(ProcessInfo {
        process_current_exe: current_exe.to_string_lossy().into_owned(),
        process_basename: basename,
        process_location: location,
        process_pid: std::process::id() as i64,
        process_host: host,
    })
}

fn get_process_basename(exe_path: &Path) -> Result<String, ProcessInfoError> {
    // Remove the extension if it exists
    exe_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| ProcessInfoError::ExePath(exe_path.display().to_string()))
}

fn get_process_location(exe_path: &Path) -> Result<String, ProcessInfoError> {
    exe_path
        .parent()
        .and_then(|dir| dir.to_str())
        .map(str::to_string)
        .ok_or_else(|| ProcessInfoError::ExePath(exe_path.display().to_string()))
}

/// CPU and memory utilisation at one moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSnapshot {
    /// Global CPU usage, 0-100.
    pub cpu_percent: f32,
    /// Share of memory not available to new allocations, 0-100.
    pub memory_percent: f32,
    /// When the snapshot was taken.
    pub taken_at: DateTime<Local>,
}

impl ResourceSnapshot {
    /// Formats the status line, e.g. `2021-03-02 15:00:00 cpu:12.5%, mem:43.0%`.
    pub fn status_line(&self) -> String {
        format!(
            "{} cpu:{:.1}%, mem:{:.1}%",
            self.taken_at.format("%Y-%m-%d %H:%M:%S"),
            self.cpu_percent,
            self.memory_percent
        )
    }
}

/// Samples CPU and memory usage.
///
/// CPU usage is a delta between two refreshes, so this waits
/// `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL` between them.
pub async fn take_resource_snapshot() -> ResourceSnapshot {
    let mut sys = System::new();
    sys.refresh_cpu();
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
    sys.refresh_cpu();
    sys.refresh_memory();

    let total = sys.total_memory();
    let memory_percent = if total > 0 {
        (total.saturating_sub(sys.available_memory()) as f64 / total as f64 * 100.0) as f32
    } else {
        0.0
    };

    ResourceSnapshot {
        cpu_percent: sys.global_cpu_info().cpu_usage().clamp(0.0, 100.0),
        memory_percent: memory_percent.clamp(0.0, 100.0),
        taken_at: Local::now(),
    }
}
