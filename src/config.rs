// src/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Affiliate and display settings for the store
    #[serde(default)]
    pub store: StoreConfig,

    /// Where and how the catalog is loaded
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Section sizes and carousel geometry
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Notice banner and toast behavior
    #[serde(default)]
    pub notice: NoticeConfig,

    /// Durable client flag storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.store.tracking_id.trim().is_empty() {
            return Err(AppError::validation("store.tracking_id is empty"));
        }
        if self.store.tracking_param.trim().is_empty() {
            return Err(AppError::validation("store.tracking_param is empty"));
        }
        if self.store.marketplace_domain.trim().is_empty() {
            return Err(AppError::validation("store.marketplace_domain is empty"));
        }
        if self.catalog.delimiter == '"' || self.catalog.delimiter == '\n' {
            return Err(AppError::validation(
                "catalog.delimiter must not be a quote or newline",
            ));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(AppError::validation("catalog.timeout_secs must be > 0"));
        }
        if self.layout.carousel_max == 0 {
            return Err(AppError::validation("layout.carousel_max must be > 0"));
        }
        if self.layout.recent_max == 0 {
            return Err(AppError::validation("layout.recent_max must be > 0"));
        }
        if self.layout.scroll_items == 0 {
            return Err(AppError::validation("layout.scroll_items must be > 0"));
        }
        Ok(())
    }
}

/// Affiliate tracking and placeholder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Tracking identifier issued by the marketplace
    #[serde(default = "defaults::tracking_id")]
    pub tracking_id: String,

    /// Marketplace domain whose links receive the tracking identifier
    #[serde(default = "defaults::marketplace_domain")]
    pub marketplace_domain: String,

    /// Query parameter name carrying the tracking identifier
    #[serde(default = "defaults::tracking_param")]
    pub tracking_param: String,

    /// Image used when a book has no cover
    #[serde(default = "defaults::placeholder_image")]
    pub placeholder_image: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            tracking_id: defaults::tracking_id(),
            marketplace_domain: defaults::marketplace_domain(),
            tracking_param: defaults::tracking_param(),
            placeholder_image: defaults::placeholder_image(),
        }
    }
}

/// Catalog source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// File path or http(s) URL of the delimited catalog
    #[serde(default = "defaults::catalog_path")]
    pub path: String,

    /// Field delimiter
    #[serde(default = "defaults::delimiter")]
    pub delimiter: char,

    /// User-Agent header for remote catalogs
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: defaults::catalog_path(),
            delimiter: defaults::delimiter(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Section sizes and carousel geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Maximum books in the carousel
    #[serde(default = "defaults::carousel_max")]
    pub carousel_max: usize,

    /// Maximum books in the recent additions grid
    #[serde(default = "defaults::recent_max")]
    pub recent_max: usize,

    /// Rendered width of one carousel item in pixels
    #[serde(default = "defaults::item_width")]
    pub item_width: u32,

    /// Gap between carousel items in pixels
    #[serde(default = "defaults::gutter")]
    pub gutter: u32,

    /// Items moved per prev/next click
    #[serde(default = "defaults::scroll_items")]
    pub scroll_items: u32,

    /// Visible width of the carousel container in pixels
    #[serde(default = "defaults::viewport_width")]
    pub viewport_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            carousel_max: defaults::carousel_max(),
            recent_max: defaults::recent_max(),
            item_width: defaults::item_width(),
            gutter: defaults::gutter(),
            scroll_items: defaults::scroll_items(),
            viewport_width: defaults::viewport_width(),
        }
    }
}

/// Notice banner and toast settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeConfig {
    /// Delay before the affiliate notice dismisses itself
    #[serde(default = "defaults::notice_delay")]
    pub delay_ms: u64,

    /// Delay before a toast notification is cleared
    #[serde(default = "defaults::toast_delay")]
    pub toast_delay_ms: u64,

    /// Banner text
    #[serde(default = "defaults::notice_message")]
    pub message: String,
}

impl NoticeConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn toast_delay(&self) -> Duration {
        Duration::from_millis(self.toast_delay_ms)
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            delay_ms: defaults::notice_delay(),
            toast_delay_ms: defaults::toast_delay(),
            message: defaults::notice_message(),
        }
    }
}

/// Durable flag storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding client flags
    #[serde(default = "defaults::flags_path")]
    pub flags_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            flags_path: defaults::flags_path(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Store defaults
    pub fn tracking_id() -> String {
        "youraffiliateID-20".into()
    }
    pub fn marketplace_domain() -> String {
        "amazon.com".into()
    }
    pub fn tracking_param() -> String {
        "tag".into()
    }
    pub fn placeholder_image() -> String {
        "/api/placeholder/150/220".into()
    }

    // Catalog defaults
    pub fn catalog_path() -> String {
        "data/books.csv".into()
    }
    pub fn delimiter() -> char {
        ','
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; bookshelf/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Layout defaults
    pub fn carousel_max() -> usize {
        12
    }
    pub fn recent_max() -> usize {
        6
    }
    pub fn item_width() -> u32 {
        140
    }
    pub fn gutter() -> u32 {
        20
    }
    pub fn scroll_items() -> u32 {
        3
    }
    pub fn viewport_width() -> u32 {
        960
    }

    // Notice defaults
    pub fn notice_delay() -> u64 {
        3000
    }
    pub fn toast_delay() -> u64 {
        3000
    }
    pub fn notice_message() -> String {
        "This site uses affiliate links to recommend products".into()
    }

    // Storage defaults
    pub fn flags_path() -> String {
        ".bookshelf/flags.json".into()
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_tracking_id() {
        let mut config = Config::default();
        config.store.tracking_id = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_quote_delimiter() {
        let mut config = Config::default();
        config.catalog.delimiter = '"';
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_carousel() {
        let mut config = Config::default();
        config.layout.carousel_max = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [store]
            tracking_id = "abc-20"

            [layout]
            recent_max = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.store.tracking_id, "abc-20");
        assert_eq!(config.store.tracking_param, "tag");
        assert_eq!(config.layout.recent_max, 4);
        assert_eq!(config.layout.carousel_max, 12);
        assert_eq!(config.notice.delay(), Duration::from_secs(3));
    }

    #[test]
    fn load_reads_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[catalog]\npath = \"embedded\"\n").unwrap();
        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.catalog.path, "embedded");
        assert!(Config::load("/definitely/not/here.toml").is_err());
    }
}
