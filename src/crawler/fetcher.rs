//! HTTP client construction and daily page fetching
//!
//! One [`reqwest::Client`] is built per crawl and shared by every page fetch
//! and image download, with response compression enabled. The client keeps
//! at most `concurrency` idle connections per host; the number of open
//! connections is bounded by the worker pool, which never has more than
//! `concurrency` requests in flight.

use crate::config::HttpConfig;
use crate::crawler::outcome::CrawlOutcome;
use crate::crawler::parser::LinkExtractor;
use crate::locator::{ImageLocator, PageLocator};
use crate::FetchError;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Builds the shared HTTP client
///
/// # Arguments
///
/// * `config` - Transport configuration
/// * `concurrency` - Upper bound on requests in flight, used to size the idle pool
///
/// # Example
///
/// ```no_run
/// use apod_crawler::config::HttpConfig;
/// use apod_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default(), 4).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig, concurrency: usize) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_max_idle_per_host(concurrency)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches daily pages and resolves their image locator
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    base_url: Url,
    extractor: LinkExtractor,
}

impl PageFetcher {
    pub fn new(client: Client, base_url: Url, extractor: LinkExtractor) -> Self {
        Self {
            client,
            base_url,
            extractor,
        }
    }

    /// Fetches the page for `date` and looks up its image
    ///
    /// # Outcomes
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | Status other than 200 | `Failed(Status)` |
    /// | Connection, timeout or body read error | `Failed(Transport)` |
    /// | No image anchor in the page | `NotFound` |
    /// | Image anchor found | `Success(ImageLocator)` |
    ///
    /// Every branch is logged; nothing is returned as an error.
    pub async fn fetch(&self, date: NaiveDate) -> CrawlOutcome<ImageLocator> {
        let page = match PageLocator::for_date(&self.base_url, date) {
            Ok(page) => page,
            Err(source) => {
                let error = FetchError::InvalidLocator {
                    input: date.to_string(),
                    source,
                };
                tracing::error!(%date, "{}", error);
                return CrawlOutcome::Failed(error);
            }
        };

        tracing::info!(%date, url = %page, "Processing date");

        let body = match self.fetch_body(&page).await {
            Ok(body) => body,
            Err(error) => {
                tracing::error!(%date, url = %page, "{}", error);
                return CrawlOutcome::Failed(error);
            }
        };

        let Some(image_path) = self.extractor.extract(&body) else {
            tracing::error!(%date, url = %page, "No image found");
            return CrawlOutcome::NotFound;
        };

        match ImageLocator::from_path(&self.base_url, image_path) {
            Ok(image) => {
                tracing::info!(%date, image = %image, "Found image");
                CrawlOutcome::Success(image)
            }
            Err(source) => {
                let error = FetchError::InvalidLocator {
                    input: image_path.to_string(),
                    source,
                };
                tracing::error!(%date, url = %page, "{}", error);
                CrawlOutcome::Failed(error)
            }
        }
    }

    /// GETs the page and reads the whole body as text
    async fn fetch_body(&self, page: &PageLocator) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: page.to_string(),
            source,
        };

        let response = self
            .client
            .get(page.url().clone())
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: page.to_string(),
                status,
            });
        }

        response.text().await.map_err(transport)
    }
}
