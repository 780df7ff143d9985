//! # Utilities Module
//!
//! General helpers that are not tied to a market provider.
//!
//! ## Contained Modules:
//!
//! - **`misc`**: process information (used to name log files) and the
//!   CPU/memory snapshot behind the system status line.

/// Miscellaneous helpers: process information and resource snapshots.
pub mod misc;
