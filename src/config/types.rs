use crate::crawler::DEFAULT_IMAGE_PATTERN;
use crate::locator::APOD_BASE_URL;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

pub const MIN_CONCURRENCY: usize = 1;
pub const MAX_CONCURRENCY: usize = 20;
pub const DEFAULT_CONCURRENCY: usize = 2;

/// Everything a crawl run needs
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Existing directory the images are written to
    pub target_dir: PathBuf,

    /// First day to fetch
    pub start_date: NaiveDate,

    /// Last day to fetch, inclusive
    pub end_date: NaiveDate,

    /// Maximum number of page fetches or downloads in flight
    pub concurrency: usize,

    pub http: HttpConfig,

    pub extract: ExtractConfig,
}

impl CrawlerConfig {
    /// Creates a config with default transport and extraction settings
    pub fn new(target_dir: impl Into<PathBuf>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            target_dir: target_dir.into(),
            start_date,
            end_date,
            concurrency: DEFAULT_CONCURRENCY,
            http: HttpConfig::default(),
            extract: ExtractConfig::default(),
        }
    }
}

/// Optional TOML file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub extract: ExtractConfig,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Base URL page and image locators are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: APOD_BASE_URL.to_string(),
            timeout_secs: 60,
            connect_timeout_secs: 10,
            user_agent: format!("apod-crawler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Image link extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Regex locating the image reference; must define a `path` capture group
    #[serde(rename = "image-pattern")]
    pub image_pattern: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            image_pattern: DEFAULT_IMAGE_PATTERN.to_string(),
        }
    }
}
