use crate::markets::error::MarketError;
use crate::markets::sina::quotes::{normalize_symbol, parse_quote_body, snapshot_from_fields, QuoteSnapshot};
use crate::retrieve::ky_http::ApiClient;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::future::Future;
use tracing::debug;

/// Production base URL of the real-time quote service.
pub const QUOTE_BASE: &str = "https://hq.sinajs.cn/";

/// A market-data interface that answers quotes keyed by instrument code.
pub trait QuoteSource {
    /// Fetches the latest quote of every code, in request order.
    ///
    /// A code the provider does not know is a parse failure for the batch.
    fn fetch_quotes(
        &self,
        codes: &[String],
    ) -> impl Future<Output = Result<Vec<QuoteSnapshot>, MarketError>>;
}

/// `QuoteSource` backed by `hq.sinajs.cn`.
pub struct SinaQuoteSource {
    client: ApiClient,
}

impl SinaQuoteSource {
    /// Creates a source against `base_url` (normally `QUOTE_BASE`).
    pub fn new(base_url: &str, max_retries: u32) -> Result<Self, MarketError> {
        Ok(Self {
            client: ApiClient::new(base_url, max_retries)?,
        })
    }

    /// The service refuses requests that do not come from its own pages.
    fn get_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();

        let header_list = [
            ("referer", "https://finance.sina.com.cn"),
            (
                "user-agent",
                "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:22.0) Gecko/20100101 Firefox/22.0",
            ),
        ];

        for (name, value) in header_list {
            if let (Ok(h_name), Ok(h_value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(h_name, h_value);
            }
        }

        headers
    }
}

impl QuoteSource for SinaQuoteSource {
    async fn fetch_quotes(&self, codes: &[String]) -> Result<Vec<QuoteSnapshot>, MarketError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let symbols: Vec<String> = codes.iter().map(|c| normalize_symbol(c)).collect();
        let path = format!("list={}", symbols.join(","));

        let response = self.client.get_text(&path, Some(Self::get_headers())).await?;
        let body = match response.data {
            Some(body) if response.success => body,
            _ => {
                return Err(MarketError::Status {
                    status: response.status,
                    url: response.url,
                })
            }
        };

        let quotes = parse_quote_body(&body);
        debug!(requested = codes.len(), returned = quotes.len(), "Sina quotes received");

        codes
            .iter()
            .zip(symbols.iter())
            .map(|(code, symbol)| {
                let fields = quotes
                    .get(symbol)
                    .ok_or_else(|| MarketError::Parse(format!("no quote returned for {}", code)))?;
                snapshot_from_fields(code, symbol, fields)
            })
            .collect()
    }
}
