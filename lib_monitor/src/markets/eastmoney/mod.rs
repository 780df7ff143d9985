//! # Eastmoney Fund Services
//!
//! - **`apicall`**: raw HTTP access to the bulk listing and the per-fund
//!   valuation estimates.
//! - **`parse`**: hand tokenizer for the JavaScript listing literal.
//! - **`catalog`**: the `FundCatalog` built from the listing and the
//!   `CatalogStore` that persists it.
//! - **`fundmonitor`**: JSONP unwrapping, catalog lookup and summary lines.

/// HTTP client for the Eastmoney fund endpoints.
pub mod apicall;
/// Fund catalog model and its on-disk store.
pub mod catalog;
/// Per-fund valuation lines.
pub mod fundmonitor;
/// Listing tokenizer.
pub mod parse;

pub use apicall::{ApiCallEastmoney, EastmoneyEndpoints};
pub use catalog::{CatalogBuild, CatalogStore, FundCatalog, FundEntry};
pub use fundmonitor::{FundEstimate, FundMonitor, RefreshSummary};
