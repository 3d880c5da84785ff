// src/catalog/source.rs

//! Catalog sources and the fetch → parse → load sequence.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::config::{CatalogConfig, StoreConfig};
use crate::error::{AppError, Result};

use super::record::parse_records;
use super::store::Catalog;

/// Sample catalog compiled into the binary.
pub const EMBEDDED_CATALOG: &str = include_str!("../../data/books.csv");

/// Where the delimited catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Remote(Url),
    Embedded,
}

impl CatalogSource {
    /// Interpret a location string: `embedded`, an http(s) URL, or a path.
    pub fn from_location(location: &str) -> Result<Self> {
        let location = location.trim();
        if location.eq_ignore_ascii_case("embedded") {
            return Ok(Self::Embedded);
        }
        if location.starts_with("http://") || location.starts_with("https://") {
            return Ok(Self::Remote(Url::parse(location)?));
        }
        if location.is_empty() {
            return Err(AppError::config("catalog location is empty"));
        }
        Ok(Self::File(PathBuf::from(location)))
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
            Self::Embedded => write!(f, "embedded catalog"),
        }
    }
}

/// Fetches and parses the catalog. One attempt per call, no retries.
pub struct CatalogLoader {
    client: reqwest::Client,
    delimiter: char,
}

impl CatalogLoader {
    /// Create a loader with a configured HTTP client.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            delimiter: config.delimiter,
        })
    }

    /// Fetch the raw catalog text.
    ///
    /// Transport errors and non-success statuses become `LoadFailed`.
    pub async fn fetch(&self, source: &CatalogSource) -> Result<String> {
        match source {
            CatalogSource::Embedded => Ok(EMBEDDED_CATALOG.to_string()),
            CatalogSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| AppError::load_failed(source.to_string(), e)),
            CatalogSource::Remote(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| AppError::load_failed(source.to_string(), e))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(AppError::load_failed(
                        source.to_string(),
                        format!("status {status}"),
                    ));
                }

                response
                    .text()
                    .await
                    .map_err(|e| AppError::load_failed(source.to_string(), e))
            }
        }
    }

    /// Fetch, parse and build the catalog.
    pub async fn load(&self, source: &CatalogSource, store: &StoreConfig) -> Result<Catalog> {
        log::info!("Loading catalog from {source}");
        let text = self.fetch(source).await?;
        let records = parse_records(&text, self.delimiter)?;
        let catalog = Catalog::load(&records, store);
        log::info!(
            "Loaded {} books ({} featured) from {}",
            catalog.len(),
            catalog.featured_count(),
            source
        );
        Ok(catalog)
    }
}
