//! # Sina Real-Time Quotes
//!
//! - **`apicall`**: the `QuoteSource` seam and its `hq.sinajs.cn` client.
//! - **`quotes`**: response parsing, symbol normalisation and line format.
//! - **`stockmonitor`**: stock, index and blue-chip target groups.

/// Quote source trait and the Sina HTTP client.
pub mod apicall;
/// Quote model, parsing and formatting.
pub mod quotes;
/// Target-group monitor over a `QuoteSource`.
pub mod stockmonitor;

pub use apicall::{QuoteSource, SinaQuoteSource};
pub use quotes::QuoteSnapshot;
pub use stockmonitor::{StockMonitor, StockTargets};
