//! Configuration module for the APOD crawler
//!
//! Run parameters (target directory, date range, concurrency) come from the
//! command line. Transport and extraction tuning can be supplied through an
//! optional TOML file; every key has a default.
//!
//! # Example
//!
//! ```no_run
//! use apod_crawler::config::load_config_file;
//! use std::path::Path;
//!
//! let file = load_config_file(Path::new("apod.toml")).unwrap();
//! println!("Fetching from {}", file.http.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ConfigFile, CrawlerConfig, ExtractConfig, HttpConfig};
pub use types::{DEFAULT_CONCURRENCY, MAX_CONCURRENCY, MIN_CONCURRENCY};

// Re-export parser and validation functions
pub use parser::{load_config_file, parse_date};
pub use validation::validate;
pub(crate) use validation::validate_extract_config;
