use crate::markets::error::MarketError;
use crate::retrieve::ky_http::{ApiClient, ApiResponse};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

/// Production base URL of the bulk fund listing.
pub const FUND_LISTING_BASE: &str = "http://fund.eastmoney.com/js/";
/// Path of the bulk fund listing below `FUND_LISTING_BASE`.
pub const FUND_LISTING_PATH: &str = "fundcode_search.js";
/// Production base URL of the per-fund valuation estimates.
pub const FUND_ESTIMATE_BASE: &str = "http://fundgz.1234567.com.cn/js/";

/// Where the two Eastmoney services live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EastmoneyEndpoints {
    /// Base URL that `FUND_LISTING_PATH` is joined onto.
    pub listing_base: String,
    /// Base URL that `<code>.js` is joined onto.
    pub estimate_base: String,
}

impl Default for EastmoneyEndpoints {
    fn default() -> Self {
        Self {
            listing_base: FUND_LISTING_BASE.to_string(),
            estimate_base: FUND_ESTIMATE_BASE.to_string(),
        }
    }
}

/// Raw access to the Eastmoney fund services.
pub struct ApiCallEastmoney {
    listing: ApiClient,
    estimate: ApiClient,
}

impl ApiCallEastmoney {
    /// Builds clients for both services.
    pub fn new(endpoints: &EastmoneyEndpoints, max_retries: u32) -> Result<Self, MarketError> {
        Ok(Self {
            listing: ApiClient::new(&endpoints.listing_base, max_retries)?,
            estimate: ApiClient::new(&endpoints.estimate_base, max_retries)?,
        })
    }

    /// Fetches the bulk listing script (`var r = [[...],...];`).
    pub async fn fetch_listing(&self) -> Result<String, MarketError> {
        let response = self
            .listing
            .get_text(FUND_LISTING_PATH, Some(Self::get_headers()))
            .await?;
        Self::into_body(response)
    }

    /// Fetches the JSONP valuation estimate of one fund.
    pub async fn fetch_estimate(&self, code: &str) -> Result<String, MarketError> {
        let path = format!("{}.js", code);
        let response = self
            .estimate
            .get_text(&path, Some(Self::get_headers()))
            .await?;
        Self::into_body(response)
    }

    fn into_body(response: ApiResponse) -> Result<String, MarketError> {
        match response.data {
            Some(body) if response.success => {
                debug!(url = %response.url, bytes = body.len(), "Eastmoney response received");
                Ok(body)
            }
            _ => Err(MarketError::Status {
                status: response.status,
                url: response.url,
            }),
        }
    }

    /// Browser-mimic headers; the services reject clients without a user agent.
    fn get_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();

        let header_list = [
            ("content-type", "application/json"),
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
