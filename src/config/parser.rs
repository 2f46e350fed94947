use crate::config::types::ConfigFile;
use crate::config::validation::{validate_extract_config, validate_http_config};
use crate::ConfigError;
use chrono::NaiveDate;
use std::path::Path;

/// Loads and validates an optional TOML configuration file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(ConfigFile)` - Parsed file; missing tables and keys take their defaults
/// * `Err(ConfigError)` - Failed to read, parse or validate the file
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&content)?;

    validate_http_config(&file.http)?;
    validate_extract_config(&file.extract)?;

    Ok(file)
}

/// Parses a command-line date in `YYYY-MM-DD` form
pub fn parse_date(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidDate(value.to_string()))
}
