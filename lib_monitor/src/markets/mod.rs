//! # Financial Market APIs Module
//!
//! Client implementations for the market data providers the monitors poll.
//!
//! ## Contained Modules:
//!
//! - **`eastmoney`**: the bulk fund listing (turned into a persisted
//!   `FundCatalog`) and the per-fund intraday valuation estimates.
//! - **`sina`**: real-time stock and index quotes.
//! - **`error`**: the `MarketError` every market operation returns.

/// Shared error type for market operations.
pub mod error;
/// Eastmoney fund listing, catalog and valuation estimates.
pub mod eastmoney;
/// Sina real-time stock and index quotes.
pub mod sina;

pub use error::{FailureKind, MarketError};
