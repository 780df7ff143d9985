//! # lib_monitor
//!
//! Fund valuation, stock/index quote and system resource monitors.
//!
//! Every folder is gated behind a cargo feature of the same name, the
//! `full` meta-feature turns them all on:
//!
//! - **`configs`**: typed JSON configuration (`global_config.json`).
//! - **`loggers`**: console plus rolling JSON file logging over `tracing`.
//! - **`markets`**: Eastmoney fund catalog and estimates, Sina quotes.
//! - **`retrieve`**: the shared HTTP text client.
//! - **`utils`**: process information and CPU/memory snapshots.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

#[cfg(feature = "configs")]
pub mod configs;
#[cfg(feature = "loggers")]
pub mod loggers;
#[cfg(feature = "markets")]
pub mod markets;
#[cfg(feature = "retrieve")]
pub mod retrieve;
#[cfg(feature = "utils")]
pub mod utils;
