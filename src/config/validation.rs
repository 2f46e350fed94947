use crate::config::types::{CrawlerConfig, ExtractConfig, HttpConfig, MAX_CONCURRENCY, MIN_CONCURRENCY};
use crate::ConfigError;
use regex::Regex;
use std::path::Path;
use url::Url;

/// Validates the entire configuration
///
/// Runs before a [`Crawler`](crate::crawler::Crawler) is built; a failure here
/// means nothing has been fetched yet.
pub fn validate(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_target_dir(&config.target_dir)?;
    validate_concurrency(config.concurrency)?;

    if config.start_date > config.end_date {
        return Err(ConfigError::InvalidRange(format!(
            "start date ({}) must be earlier than or equal to end date ({})",
            config.start_date, config.end_date
        )));
    }

    validate_http_config(&config.http)?;
    validate_extract_config(&config.extract)?;
    Ok(())
}

/// Validates that the target directory exists and is a directory
fn validate_target_dir(dir: &Path) -> Result<(), ConfigError> {
    if !dir.exists() {
        return Err(ConfigError::MissingDirectory(dir.to_path_buf()));
    }

    if !dir.is_dir() {
        return Err(ConfigError::NotADirectory(dir.to_path_buf()));
    }

    Ok(())
}

fn validate_concurrency(concurrency: usize) -> Result<(), ConfigError> {
    if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
        return Err(ConfigError::InvalidConcurrency(format!(
            "concurrency must be between {} and {} inclusive, got {}",
            MIN_CONCURRENCY, MAX_CONCURRENCY, concurrency
        )));
    }
    Ok(())
}

/// Validates HTTP transport configuration
pub(crate) fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "https" && base.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    // Url::join drops the last segment unless the base ends with a slash
    if !base.path().ends_with('/') {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must end with '/'",
            config.base_url
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be greater than 0".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be greater than 0".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the image pattern compiles and captures `path`
pub(crate) fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    let regex = Regex::new(&config.image_pattern)
        .map_err(|e| ConfigError::Validation(format!("Invalid image-pattern: {}", e)))?;

    if !regex.capture_names().flatten().any(|name| name == "path") {
        return Err(ConfigError::Validation(
            "image-pattern must define a named group 'path'".to_string(),
        ));
    }

    Ok(())
}
