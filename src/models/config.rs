//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Placeholder for the route number in page templates.
pub const ROUTE_PLACEHOLDER: &str = "{route}";

/// Placeholder for the direction number in page templates.
pub const DIRECTION_PLACEHOLDER: &str = "{direction}";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Where the route pages live and how their links look
    #[serde(default)]
    pub source: SourceConfig,

    /// Snapshot output location
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.storage.snapshot_file.trim().is_empty() {
            return Err(AppError::validation("storage.snapshot_file is empty"));
        }
        self.source.validate()
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay after each request in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Stop pages of one route fetched ahead of time (1 = strictly sequential)
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Page locations and link formats of the transit site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL the page paths are resolved against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Page listing every route
    #[serde(default = "defaults::routes_path")]
    pub routes_path: String,

    /// Page listing a route's directions; contains `{route}`
    #[serde(default = "defaults::directions_path")]
    pub directions_path: String,

    /// Page listing the stops of a route in one direction; contains `{route}` and `{direction}`
    #[serde(default = "defaults::stops_path")]
    pub stops_path: String,

    /// CSS selector for the anchors carrying names and ids
    #[serde(default = "defaults::link_selector")]
    pub link_selector: String,

    #[serde(default = "defaults::route_pattern")]
    pub route_pattern: String,

    #[serde(default = "defaults::direction_pattern")]
    pub direction_pattern: String,

    #[serde(default = "defaults::stop_pattern")]
    pub stop_pattern: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            routes_path: defaults::routes_path(),
            directions_path: defaults::directions_path(),
            stops_path: defaults::stops_path(),
            link_selector: defaults::link_selector(),
            route_pattern: defaults::route_pattern(),
            direction_pattern: defaults::direction_pattern(),
            stop_pattern: defaults::stop_pattern(),
        }
    }
}

impl SourceConfig {
    /// Parse the base URL.
    pub fn base(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    fn validate(&self) -> Result<()> {
        self.base()?;

        if !self.directions_path.contains(ROUTE_PLACEHOLDER) {
            return Err(AppError::validation(format!(
                "source.directions_path must contain {ROUTE_PLACEHOLDER}"
            )));
        }
        if !self.stops_path.contains(ROUTE_PLACEHOLDER)
            || !self.stops_path.contains(DIRECTION_PLACEHOLDER)
        {
            return Err(AppError::validation(format!(
                "source.stops_path must contain {ROUTE_PLACEHOLDER} and {DIRECTION_PLACEHOLDER}"
            )));
        }

        scraper::Selector::parse(&self.link_selector)
            .map_err(|e| AppError::selector(&self.link_selector, format!("{e:?}")))?;

        for (field, pattern) in [
            ("source.route_pattern", &self.route_pattern),
            ("source.direction_pattern", &self.direction_pattern),
            ("source.stop_pattern", &self.stop_pattern),
        ] {
            compile_id_pattern(pattern)
                .map_err(|e| AppError::validation(format!("{field}: {e}")))?;
        }
        Ok(())
    }
}

/// Compile an id pattern, requiring a capture group for the id.
pub fn compile_id_pattern(pattern: &str) -> Result<Regex> {
    let regex = Regex::new(pattern).map_err(|e| AppError::config(e.to_string()))?;
    if regex.captures_len() < 2 {
        return Err(AppError::config(format!(
            "pattern '{pattern}' has no capture group for the id"
        )));
    }
    Ok(regex)
}

/// Snapshot output location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,

    #[serde(default = "defaults::snapshot_file")]
    pub snapshot_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
            snapshot_file: defaults::snapshot_file(),
        }
    }
}

impl StorageConfig {
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; transit-crawler/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn max_concurrent() -> usize {
        1
    }

    // Source defaults
    pub fn base_url() -> String {
        "http://teuchter.lan:8000/".into()
    }
    pub fn routes_path() -> String {
        "routes.html".into()
    }
    pub fn directions_path() -> String {
        "direction{route}.html".into()
    }
    pub fn stops_path() -> String {
        "direction{route}d{direction}.html".into()
    }
    pub fn link_selector() -> String {
        "a.ada".into()
    }
    pub fn route_pattern() -> String {
        r"r=(\d{1,2})$".into()
    }
    pub fn direction_pattern() -> String {
        r"d=(\d{1,2})$".into()
    }
    pub fn stop_pattern() -> String {
        r"s=(\d+)$".into()
    }

    // Storage defaults
    pub fn output_dir() -> String {
        "storage".into()
    }
    pub fn snapshot_file() -> String {
        "bus_data.json".into()
    }
}
