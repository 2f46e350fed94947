//! APOD crawler: downloads the Astronomy Picture of the Day for a range of dates
//!
//! The crawl runs in two phases. First every daily page in the date range is
//! fetched and scanned for its image link, then every image found is streamed
//! to the target directory. Both phases share one HTTP client and run under a
//! fixed-size worker pool.

pub mod build_info;
pub mod config;
pub mod crawler;
pub mod dates;
pub mod locator;

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Start date {start} must be earlier than or equal to end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("'{}' does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid concurrency: {0}")]
    InvalidConcurrency(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl ConfigError {
    /// Process exit code the command-line front end reports for this error
    ///
    /// 1 missing directory, 2 not a directory, 3 concurrency or date range
    /// out of bounds, 4 anything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingDirectory(_) => 1,
            Self::NotADirectory(_) => 2,
            Self::InvalidConcurrency(_) | Self::InvalidRange(_) => 3,
            _ => 4,
        }
    }
}

/// Why a single page fetch or image download failed
///
/// These never escape the crawler; they are carried inside
/// [`crawler::CrawlOutcome::Failed`] and logged.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Got HTTP status {status} on {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Cannot build locator from '{input}': {source}")]
    InvalidLocator {
        input: String,
        source: ::url::ParseError,
    },

    #[error("No file name in {url}")]
    NoFileName { url: String },

    #[error("Writing {} failed: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{CrawlerConfig, HttpConfig};
pub use crawler::{CrawlOutcome, CrawlReport, Crawler};
pub use dates::DateRange;
pub use locator::{ImageLocator, PageLocator};
