//! Crawler module for APOD page fetching and image downloading
//!
//! This module contains the core crawling logic, including:
//! - HTTP client construction
//! - Image link extraction from page markup
//! - Page fetching and streamed image downloads
//! - The bounded worker pool both phases run on
//! - Overall crawl coordination

mod coordinator;
mod downloader;
mod fetcher;
mod outcome;
mod parser;
mod pool;

pub use coordinator::{CrawlReport, Crawler};
pub use downloader::{DownloadedFile, ImageDownloader, CHUNK_SIZE};
pub use fetcher::{build_http_client, PageFetcher};
pub use outcome::CrawlOutcome;
pub use parser::{LinkExtractor, DEFAULT_IMAGE_PATTERN};
pub use pool::WorkerPool;

use crate::config::CrawlerConfig;
use crate::CrawlerError;

/// Runs a complete crawl operation
///
/// Builds a [`Crawler`] from `config` and runs both phases to completion.
/// Only construction can fail; per-date and per-image failures are reported
/// in the returned [`CrawlReport`].
///
/// # Example
///
/// ```no_run
/// use apod_crawler::config::CrawlerConfig;
/// use apod_crawler::crawler::crawl;
/// use chrono::NaiveDate;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlerConfig::new(
///     "/tmp/apod",
///     NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2022, 1, 7).unwrap(),
/// );
/// let report = crawl(config).await?;
/// println!("{} images downloaded", report.images_downloaded());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: CrawlerConfig) -> Result<CrawlReport, CrawlerError> {
    let crawler = Crawler::new(config)?;
    Ok(crawler.crawl().await)
}
