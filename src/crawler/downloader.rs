//! Streamed image downloads
//!
//! Images are written to `{target_dir}/{last path segment}`. The file is
//! created (or truncated) only after a 200 response arrives, then the body is
//! appended in [`CHUNK_SIZE`] blocks as it streams in. A transport failure
//! mid-stream leaves the bytes written so far in place.

use crate::crawler::outcome::CrawlOutcome;
use crate::locator::ImageLocator;
use crate::FetchError;
use reqwest::{Client, Response, StatusCode};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Size of the blocks written to disk
pub const CHUNK_SIZE: usize = 8 * 1024;

/// A completed download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Downloads images into one target directory
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    client: Client,
    target_dir: PathBuf,
}

impl ImageDownloader {
    pub fn new(client: Client, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            target_dir: target_dir.into(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Downloads `image` into the target directory
    ///
    /// Never returns an error; failures are logged and reported as
    /// [`CrawlOutcome::Failed`].
    pub async fn download(&self, image: &ImageLocator) -> CrawlOutcome<DownloadedFile> {
        let Some(path) = image.download_target(&self.target_dir) else {
            let error = FetchError::NoFileName {
                url: image.to_string(),
            };
            tracing::error!(url = %image, "{}", error);
            return CrawlOutcome::Failed(error);
        };

        match self.fetch_to_file(image, &path).await {
            Ok(bytes) => {
                tracing::info!(path = %path.display(), url = %image, bytes, "Downloaded image");
                CrawlOutcome::Success(DownloadedFile { path, bytes })
            }
            Err(error) => {
                tracing::error!(path = %path.display(), url = %image, "{}", error);
                CrawlOutcome::Failed(error)
            }
        }
    }

    async fn fetch_to_file(&self, image: &ImageLocator, path: &Path) -> Result<u64, FetchError> {
        tracing::debug!(url = %image, "Requesting image");

        let response = self
            .client
            .get(image.url().clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: image.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: image.to_string(),
                status,
            });
        }

        stream_to_file(response, image, path).await
    }
}

/// Streams the response body into `path`, returning the number of bytes written
async fn stream_to_file(
    mut response: Response,
    image: &ImageLocator,
    path: &Path,
) -> Result<u64, FetchError> {
    let io_error = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).await.map_err(io_error)?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let mut written: u64 = 0;

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                writer.write_all(&chunk).await.map_err(io_error)?;
                written += chunk.len() as u64;
            }
            Ok(None) => break,
            Err(source) => {
                // Keep what already arrived
                if let Err(e) = writer.flush().await {
                    tracing::warn!(path = %path.display(), "Failed to flush partial file: {}", e);
                }
                return Err(FetchError::Transport {
                    url: image.to_string(),
                    source,
                });
            }
        }
    }

    writer.flush().await.map_err(io_error)?;
    Ok(written)
}
