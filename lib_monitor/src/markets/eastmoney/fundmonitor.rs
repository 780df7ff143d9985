//! # Fund Valuation Monitor
//!
//! Turns the per-fund estimate endpoint into summary lines such as
//!
//! ```text
//! 基金:华夏成长混合 | 混合型-灵活 | 收益率: 0.52 %
//! ```
//!
//! The estimate arrives as JSONP, `jsonpgz({...});`, so the JSON payload is
//! cut out with a pattern before decoding. The category is not part of the
//! estimate and comes from the `FundCatalog`.

use crate::markets::eastmoney::apicall::ApiCallEastmoney;
use crate::markets::eastmoney::catalog::{CatalogStore, FundCatalog};
use crate::markets::error::MarketError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use static_init::dynamic;
use tracing::{info, warn};

#[dynamic]
static JSONPGZ_PATTERN: Regex =
    Regex::new(r"^jsonpgz\((.*)\)").expect("jsonpgz pattern is a valid regex");

/// The intraday valuation estimate of one fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundEstimate {
    /// Fund code.
    pub fundcode: String,
    /// Display name.
    pub name: String,
    /// Date of the last published net asset value.
    #[serde(default)]
    pub jzrq: Option<String>,
    /// Last published net asset value per unit.
    #[serde(default)]
    pub dwjz: Option<String>,
    /// Estimated net asset value.
    #[serde(default)]
    pub gsz: Option<String>,
    /// Estimated change in percent.
    pub gszzl: String,
    /// Time of the estimate.
    #[serde(default)]
    pub gztime: Option<String>,
}

/// Counts reported after a successful catalog refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Funds in the new catalog.
    pub funds: usize,
    /// Listing records skipped for a wrong field count.
    pub rejected: usize,
    /// Listing records ignored as duplicate codes.
    pub duplicates: usize,
}

/// Returns the JSON text inside a `jsonpgz(...)` wrapper.
pub fn unwrap_jsonp(text: &str) -> Result<&str, MarketError> {
    JSONPGZ_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| MarketError::Parse("response is not wrapped in jsonpgz(...)".to_string()))
}

/// Unwraps and decodes one estimate response.
pub fn parse_estimate(text: &str) -> Result<FundEstimate, MarketError> {
    let payload = unwrap_jsonp(text)?;
    Ok(serde_json::from_str(payload)?)
}

/// Formats the summary line of one fund. An unknown category leaves its
/// slot empty.
pub fn format_fund_line(estimate: &FundEstimate, category: Option<&str>) -> String {
    format!(
        "基金:{} | {} | 收益率: {} %",
        estimate.name,
        category.unwrap_or_default(),
        estimate.gszzl
    )
}

/// Fetches fund estimates and labels them with catalog categories.
pub struct FundMonitor {
    api_call: ApiCallEastmoney,
    store: CatalogStore,
    target_fund: Vec<String>,
    /// Set once loading or refreshing the catalog has failed this session.
    catalog_unavailable: bool,
}

impl FundMonitor {
    /// Creates a monitor. The catalog is not touched until the first lookup.
    pub fn new(api_call: ApiCallEastmoney, store: CatalogStore, target_fund: Vec<String>) -> Self {
        Self {
            api_call,
            store,
            target_fund,
            catalog_unavailable: false,
        }
    }

    /// The catalog store.
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Mutable access to the catalog store, e.g. to `reload` it.
    pub fn store_mut(&mut self) -> &mut CatalogStore {
        self.catalog_unavailable = false;
        &mut self.store
    }

    /// The default fund codes polled by `fund_lines(None)`.
    pub fn target_fund(&self) -> &[String] {
        &self.target_fund
    }

    /// Downloads the bulk listing, rebuilds the catalog and persists it.
    ///
    /// On any failure the file on disk and the in-memory catalog stay as
    /// they were.
    pub async fn refresh_catalog(&mut self) -> Result<RefreshSummary, MarketError> {
        info!("Refreshing the fund catalog");
        let text = self.api_call.fetch_listing().await?;
        let build = FundCatalog::from_listing(&text)?;

        let summary = RefreshSummary {
            funds: build.catalog.len(),
            rejected: build.rejected,
            duplicates: build.duplicates,
        };

        self.store.replace(build.catalog)?;
        self.catalog_unavailable = false;
        info!(
            path = %self.store.path().display(),
            funds = summary.funds,
            rejected = summary.rejected,
            duplicates = summary.duplicates,
            "Fund catalog refreshed and saved"
        );
        Ok(summary)
    }

    /// Makes sure a catalog is in memory, loading or refreshing as needed.
    ///
    /// A missing file triggers a refresh from the network. Returns `false`
    /// when no catalog could be obtained; lookups then yield no category
    /// until `refresh_catalog` or `store_mut` is used.
    pub async fn ensure_catalog(&mut self) -> bool {
        if self.store.is_loaded() {
            return true;
        }
        if self.catalog_unavailable {
            return false;
        }

        let outcome = if self.store.exists_on_disk() {
            self.store.reload().map(|_| ())
        } else {
            warn!(
                path = %self.store.path().display(),
                "Fund catalog file is missing, refreshing it"
            );
            self.refresh_catalog().await.map(|_| ())
        };

        match outcome {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Fund catalog unavailable, categories will be empty");
                self.catalog_unavailable = true;
                false
            }
        }
    }

    /// The category of `code`, or `None` when it is unknown.
    pub async fn category(&mut self, code: &str) -> Option<String> {
        self.ensure_catalog().await;
        self.store.category(code).map(str::to_string)
    }

    /// Fetches one fund estimate and formats its summary line.
    pub async fn fund_line(&mut self, code: &str) -> Result<String, MarketError> {
        let text = self.api_call.fetch_estimate(code).await?;
        let estimate = parse_estimate(&text)?;
        let category = self.category(&estimate.fundcode).await;
        Ok(format_fund_line(&estimate, category.as_deref()))
    }

    /// Fetches every fund in `targets`, or the configured `target_fund` list
    /// when `None`, one after the other.
    pub async fn fund_lines(
        &mut self,
        targets: Option<&[String]>,
    ) -> Vec<(String, Result<String, MarketError>)> {
        let codes = match targets {
            Some(codes) => codes.to_vec(),
            None => {
                info!(count = self.target_fund.len(), "Polling the configured target funds");
                self.target_fund.clone()
            }
        };

        let mut result = Vec::with_capacity(codes.len());
        for code in codes {
            let line = self.fund_line(&code).await;
            result.push((code, line));
        }
        result
    }
}
