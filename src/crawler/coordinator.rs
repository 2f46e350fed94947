//! Crawler coordinator - two-phase crawl orchestration
//!
//! Phase 1 fetches the page of every date in the range and collects the image
//! locators found. Phase 2 starts once phase 1 has fully drained and
//! downloads every collected image. Both phases run on the same worker pool
//! and HTTP client, which live exactly as long as the [`Crawler`].

use crate::config::{validate_extract_config, CrawlerConfig};
use crate::crawler::downloader::{DownloadedFile, ImageDownloader};
use crate::crawler::fetcher::{build_http_client, PageFetcher};
use crate::crawler::outcome::CrawlOutcome;
use crate::crawler::parser::LinkExtractor;
use crate::crawler::pool::WorkerPool;
use crate::dates::DateRange;
use crate::locator::ImageLocator;
use crate::{ConfigError, CrawlerError};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Everything that happened during one crawl
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Outcome of every page fetch, in date order
    pub pages: Vec<(NaiveDate, CrawlOutcome<ImageLocator>)>,

    /// Outcome of every image download, in completion order
    pub images: Vec<(ImageLocator, CrawlOutcome<DownloadedFile>)>,
}

impl CrawlReport {
    pub fn pages_found(&self) -> usize {
        self.pages.iter().filter(|(_, o)| o.is_success()).count()
    }

    pub fn pages_not_found(&self) -> usize {
        self.pages.iter().filter(|(_, o)| o.is_not_found()).count()
    }

    pub fn pages_failed(&self) -> usize {
        self.pages.iter().filter(|(_, o)| o.is_failed()).count()
    }

    pub fn images_downloaded(&self) -> usize {
        self.images.iter().filter(|(_, o)| o.is_success()).count()
    }

    pub fn images_failed(&self) -> usize {
        self.images.iter().filter(|(_, o)| o.is_failed()).count()
    }

    /// Total bytes written by successful downloads
    pub fn bytes_written(&self) -> u64 {
        self.images
            .iter()
            .filter_map(|(_, o)| o.as_success())
            .map(|file| file.bytes)
            .sum()
    }
}

/// Main crawler structure
///
/// Owns the worker pool and the shared HTTP client. Both are acquired in
/// [`Crawler::new`] and released when the crawler is dropped, which
/// [`Crawler::crawl`] does on completion.
pub struct Crawler {
    range: DateRange,
    pool: WorkerPool,
    fetcher: Arc<PageFetcher>,
    downloader: Arc<ImageDownloader>,
}

impl Crawler {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration, already validated by the caller
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(CrawlerError)` - The range is reversed, the base URL or image
    ///   pattern is invalid, or the HTTP client could not be built
    pub fn new(config: CrawlerConfig) -> Result<Self, CrawlerError> {
        let range = DateRange::new(config.start_date, config.end_date)?;

        let base_url = Url::parse(&config.http.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;
        validate_extract_config(&config.extract)?;
        let extractor = LinkExtractor::new(&config.extract.image_pattern)
            .map_err(|e| ConfigError::Validation(format!("Invalid image-pattern: {}", e)))?;

        tracing::debug!(
            base_url = %base_url,
            concurrency = config.concurrency,
            "Starting http client"
        );
        let client = build_http_client(&config.http, config.concurrency)?;
        let pool = WorkerPool::new(config.concurrency);

        Ok(Self {
            range,
            pool,
            fetcher: Arc::new(PageFetcher::new(client.clone(), base_url, extractor)),
            downloader: Arc::new(ImageDownloader::new(client, config.target_dir)),
        })
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Runs both phases to completion and releases the pool and client
    ///
    /// Individual failures never abort the run; they show up in the report.
    pub async fn crawl(self) -> CrawlReport {
        let start_time = Instant::now();
        tracing::info!(
            start = %self.range.start(),
            end = %self.range.end(),
            days = self.range.len(),
            workers = self.pool.size(),
            "Starting crawl"
        );

        let pages = self.fetch_pages().await;
        let images: Vec<ImageLocator> = pages
            .iter()
            .filter_map(|(_, outcome)| outcome.as_success().cloned())
            .collect();
        tracing::info!(
            images = images.len(),
            not_found = pages.iter().filter(|(_, o)| o.is_not_found()).count(),
            failed = pages.iter().filter(|(_, o)| o.is_failed()).count(),
            "Found {} images",
            images.len()
        );

        let images = self.download_images(images).await;
        let report = CrawlReport { pages, images };

        tracing::info!(
            downloaded = report.images_downloaded(),
            failed = report.images_failed(),
            bytes = report.bytes_written(),
            "Crawl completed in {:?}",
            start_time.elapsed()
        );

        report
    }

    /// Phase 1: fetch every page in the range
    async fn fetch_pages(&self) -> Vec<(NaiveDate, CrawlOutcome<ImageLocator>)> {
        let fetcher = Arc::clone(&self.fetcher);
        let mut pages = self
            .pool
            .run_phase("pages", self.range.iter(), move |date| {
                let fetcher = Arc::clone(&fetcher);
                async move { (date, fetcher.fetch(date).await) }
            })
            .await;

        pages.sort_by_key(|(date, _)| *date);
        pages
    }

    /// Phase 2: download every collected image
    async fn download_images(
        &self,
        images: Vec<ImageLocator>,
    ) -> Vec<(ImageLocator, CrawlOutcome<DownloadedFile>)> {
        let downloader = Arc::clone(&self.downloader);
        self.pool
            .run_phase("images", group_by_file_name(images), move |group| {
                let downloader = Arc::clone(&downloader);
                async move {
                    let mut outcomes = Vec::with_capacity(group.len());
                    for image in group {
                        let outcome = downloader.download(&image).await;
                        outcomes.push((image, outcome));
                    }
                    outcomes
                }
            })
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}

impl Drop for Crawler {
    fn drop(&mut self) {
        tracing::debug!("Shutting down http client");
    }
}

/// Groups locators that would be written to the same local file
///
/// Each group becomes one pool job and is downloaded sequentially, so two
/// dates publishing an image under the same name never interleave writes;
/// the later date wins. Input order is kept within and across groups.
fn group_by_file_name(images: Vec<ImageLocator>) -> Vec<Vec<ImageLocator>> {
    let mut groups: Vec<Vec<ImageLocator>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for image in images {
        let Some(name) = image.file_name().map(str::to_string) else {
            groups.push(vec![image]);
            continue;
        };

        match index.get(&name) {
            Some(&i) => {
                tracing::warn!(file = %name, url = %image, "File name collision, later image overwrites earlier one");
                groups[i].push(image);
            }
            None => {
                index.insert(name, groups.len());
                groups.push(vec![image]);
            }
        }
    }

    groups
}
