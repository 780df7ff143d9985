//! # Fund Catalog
//!
//! The mapping from fund code to `[name, category]` built from the bulk
//! listing, and the `CatalogStore` that owns the in-memory copy together with
//! its file on disk.
//!
//! On disk the catalog is a single-line JSON object, UTF-8 with non-ASCII
//! characters written literally:
//!
//! ```text
//! {"000001":["华夏成长混合","混合型-灵活"],"000003":["中海可转债债券A","债券型-混合二级"]}
//! ```

use crate::markets::eastmoney::parse::{extract_arrays, listing_body, parse_record, FundRecord};
use crate::markets::error::MarketError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Display name and category of one fund, serialised as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundEntry(pub String, pub String);

impl FundEntry {
    /// The fund's display name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The fund's category label, e.g. `混合型-灵活`.
    pub fn category(&self) -> &str {
        &self.1
    }
}

/// Fund code to `FundEntry`, ordered by code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FundCatalog {
    funds: BTreeMap<String, FundEntry>,
}

/// The outcome of building a catalog from one listing response.
#[derive(Debug, Clone)]
pub struct CatalogBuild {
    /// The catalog built from every well-formed record.
    pub catalog: FundCatalog,
    /// Records skipped because of a wrong field count.
    pub rejected: usize,
    /// Records ignored because their code was already present.
    pub duplicates: usize,
}

impl FundCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record unless its code is already present.
    ///
    /// Returns `false` when an earlier record with the same code was kept.
    pub fn insert_first(&mut self, record: FundRecord) -> bool {
        if self.funds.contains_key(&record.code) {
            return false;
        }
        self.funds
            .insert(record.code, FundEntry(record.name, record.category));
        true
    }

    /// Looks up a fund by code.
    pub fn get(&self, code: &str) -> Option<&FundEntry> {
        self.funds.get(code)
    }

    /// Looks up the category of a fund by code.
    pub fn category(&self, code: &str) -> Option<&str> {
        self.get(code).map(FundEntry::category)
    }

    /// Number of funds in the catalog.
    pub fn len(&self) -> usize {
        self.funds.len()
    }

    /// Whether the catalog holds no funds.
    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }

    /// Iterates the catalog in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FundEntry)> {
        self.funds.iter()
    }

    /// Builds a catalog from the raw bulk listing response.
    ///
    /// Records with the wrong arity are logged and skipped; the first record
    /// seen for a code wins.
    ///
    /// # Errors
    /// `MarketError::Parse` if the body contains no array literal at all.
    pub fn from_listing(text: &str) -> Result<CatalogBuild, MarketError> {
        let body = listing_body(text)
            .ok_or_else(|| MarketError::Parse("no array literal in fund listing".to_string()))?;

        let mut catalog = FundCatalog::new();
        let mut rejected = 0;
        let mut duplicates = 0;

        for raw in extract_arrays(body) {
            match parse_record(raw) {
                Ok(record) => {
                    if !catalog.insert_first(record) {
                        duplicates += 1;
                    }
                }
                Err(e) => {
                    warn!(record = raw, error = %e, "Skipping malformed fund listing record");
                    rejected += 1;
                }
            }
        }

        debug!(
            funds = catalog.len(),
            rejected, duplicates, "Fund listing parsed"
        );

        Ok(CatalogBuild {
            catalog,
            rejected,
            duplicates,
        })
    }

    /// Serialises the catalog to its one-line JSON form.
    pub fn to_json(&self) -> Result<String, MarketError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads a catalog file.
    pub fn load(path: &Path) -> Result<Self, MarketError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the catalog to `path`, replacing any existing file.
    ///
    /// The JSON goes to a sibling `.tmp` file first and is renamed into place,
    /// so a failed write leaves the previous catalog intact.
    pub fn save(&self, path: &Path) -> Result<(), MarketError> {
        let json = self.to_json()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

/// Explicitly owned catalog cache.
///
/// Nothing is loaded until asked for and nothing is refreshed behind the
/// caller's back: `reload` re-reads the file, `replace` persists a freshly
/// built catalog and swaps it in.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    catalog: Option<FundCatalog>,
}

impl CatalogStore {
    /// Creates a store backed by the file at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            catalog: None,
        }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a catalog is held in memory.
    pub fn is_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    /// Whether the backing file exists.
    pub fn exists_on_disk(&self) -> bool {
        self.path.is_file()
    }

    /// The in-memory catalog, if loaded.
    pub fn catalog(&self) -> Option<&FundCatalog> {
        self.catalog.as_ref()
    }

    /// Category of `code` from the in-memory catalog.
    pub fn category(&self, code: &str) -> Option<&str> {
        self.catalog.as_ref().and_then(|c| c.category(code))
    }

    /// Re-reads the backing file, replacing the in-memory copy.
    ///
    /// On failure the previous in-memory copy is kept.
    pub fn reload(&mut self) -> Result<&FundCatalog, MarketError> {
        let catalog = FundCatalog::load(&self.path)?;
        info!(path = %self.path.display(), funds = catalog.len(), "Fund catalog loaded");
        Ok(&*self.catalog.insert(catalog))
    }

    /// Persists `catalog` and makes it the in-memory copy.
    ///
    /// If the write fails neither the file nor the in-memory copy changes.
    pub fn replace(&mut self, catalog: FundCatalog) -> Result<&FundCatalog, MarketError> {
        catalog.save(&self.path)?;
        Ok(&*self.catalog.insert(catalog))
    }

    /// Drops the in-memory copy; the next lookup reads the file again.
    pub fn invalidate(&mut self) {
        self.catalog = None;
    }
}
