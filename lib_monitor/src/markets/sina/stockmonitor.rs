//! # Stock and Index Monitor
//!
//! Formats quotes for the three configured target groups: individual stocks,
//! indices and the "mao" basket of blue chips.

use crate::markets::error::MarketError;
use crate::markets::sina::apicall::QuoteSource;
use crate::markets::sina::quotes::format_quote_line;
use tracing::debug;

/// The code lists a `StockMonitor` polls by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockTargets {
    /// Individual stocks.
    pub stock: Vec<String>,
    /// Indices, as codes or aliases such as `hs300`.
    pub index: Vec<String>,
    /// The blue-chip basket.
    pub mao: Vec<String>,
}

/// Formats quote lines for target groups of a `QuoteSource`.
pub struct StockMonitor<S> {
    source: S,
    targets: StockTargets,
}

impl<S: QuoteSource> StockMonitor<S> {
    /// Creates a monitor over `source`.
    pub fn new(source: S, targets: StockTargets) -> Self {
        Self { source, targets }
    }

    /// The configured target groups.
    pub fn targets(&self) -> &StockTargets {
        &self.targets
    }

    /// Fetches `codes` in one request and formats a line per quote.
    ///
    /// The whole batch fails when the request or any quote fails.
    pub async fn quote_lines(&self, codes: &[String]) -> Result<Vec<String>, MarketError> {
        let quotes = self.source.fetch_quotes(codes).await?;
        debug!(count = quotes.len(), "Formatting quotes");
        quotes.iter().map(format_quote_line).collect()
    }

    /// Lines for the configured stocks.
    pub async fn stock_lines(&self) -> Result<Vec<String>, MarketError> {
        self.quote_lines(&self.targets.stock).await
    }

    /// Lines for the configured indices.
    pub async fn index_lines(&self) -> Result<Vec<String>, MarketError> {
        self.quote_lines(&self.targets.index).await
    }

    /// Lines for the configured blue-chip basket.
    pub async fn mao_lines(&self) -> Result<Vec<String>, MarketError> {
        self.quote_lines(&self.targets.mao).await
    }
}
