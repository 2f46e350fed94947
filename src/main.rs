//! APOD crawler main entry point
//!
//! This is the command-line interface for the APOD crawler.

use anyhow::Context;
use apod_crawler::build_info::BuildInfo;
use apod_crawler::config::{
    load_config_file, parse_date, validate, ConfigFile, CrawlerConfig, DEFAULT_CONCURRENCY,
};
use apod_crawler::crawler::crawl;
use apod_crawler::ConfigError;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// APOD crawler: downloads Astronomy Picture of the Day images
///
/// Fetches the APOD page of every day between START_DATE and END_DATE
/// (inclusive) and stores each day's image in TARGET_DIR.
#[derive(Parser, Debug)]
#[command(name = "apod-crawler")]
#[command(version)]
#[command(about = "Downloads Astronomy Picture of the Day images", long_about = None)]
struct Cli {
    /// Directory to store images. Must exist.
    #[arg(value_name = "TARGET_DIR")]
    target_dir: PathBuf,

    /// Date to start downloading pictures from (YYYY-MM-DD)
    #[arg(value_name = "START_DATE")]
    start_date: String,

    /// Date up to which pictures are downloaded (YYYY-MM-DD)
    #[arg(value_name = "END_DATE")]
    end_date: String,

    /// Number of concurrent downloads. Min 1, max 20
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Optional TOML file with [http] and [extract] settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("{}", BuildInfo::current());

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}", e);
            return exit_code_for(&e);
        }
    };

    tracing::info!(
        "Download APOD images to {} between {} and {} (concurrency: {})",
        config.target_dir.display(),
        config.start_date,
        config.end_date,
        config.concurrency
    );

    match crawl(config).await {
        Ok(report) => {
            tracing::info!(
                "Downloaded {} of {} images ({} pages without image, {} pages failed)",
                report.images_downloaded(),
                report.images.len(),
                report.pages_not_found(),
                report.pages_failed()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Error while crawling: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("apod_crawler=info,warn"),
            1 => EnvFilter::new("apod_crawler=debug,info"),
            2 => EnvFilter::new("apod_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges command-line arguments with the optional config file and validates the result
fn build_config(cli: &Cli) -> anyhow::Result<CrawlerConfig> {
    let file = match &cli.config {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigFile::default(),
    };

    let mut config = CrawlerConfig::new(
        cli.target_dir.clone(),
        parse_date(&cli.start_date)?,
        parse_date(&cli.end_date)?,
    );
    config.concurrency = cli.concurrency;
    config.http = file.http;
    config.extract = file.extract;

    validate(&config)?;
    Ok(config)
}

/// Maps a configuration failure to the process exit code
fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    let code = error
        .downcast_ref::<ConfigError>()
        .map(ConfigError::exit_code)
        .unwrap_or(4);
    ExitCode::from(code)
}
