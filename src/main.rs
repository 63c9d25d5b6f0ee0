//! Podcast Fetcher CLI application
//!
//! Downloads every episode of a podcast feed in fixed-size concurrent
//! batches and tags the files from the feed entries.

use std::process;

use tracing::{info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};

use podcast_fetcher::cli::{handle_run, Cli};
use podcast_fetcher::config::AppConfig;
use podcast_fetcher::constants;
use podcast_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = AppConfig::load(None).await?;

    init_logging(&config.logging.level);

    info!("Podcast Fetcher v{} starting", env!("CARGO_PKG_VERSION"));
    handle_run(&cli, config).await
}

/// Initialize stderr logging at the configured level
fn init_logging(level: &str) {
    let requested: std::result::Result<Directive, _> = format!("podcast_fetcher={}", level).parse();
    let invalid_level = requested.is_err();
    let directive = requested.or_else(|_| {
        format!("podcast_fetcher={}", constants::config::DEFAULT_LOG_LEVEL).parse()
    });

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if invalid_level {
        warn!("Unknown log level '{}', using defaults", level);
    }
}
