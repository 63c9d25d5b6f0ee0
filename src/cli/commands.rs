//! Command handler for the download run
//!
//! Wires configuration, feed retrieval, the download directory and the
//! coordinator together, then prints the final statistics.

use tracing::{error, info};

use crate::app::{Coordinator, DownloadDirectory, FeedSource, RunReport};
use crate::cli::args::Cli;
use crate::config::AppConfig;
use crate::errors::Result;

/// Handle a full run: fetch the feed, process it and print the statistics
///
/// # Errors
///
/// Returns `AppError` if the configuration is invalid, the feed cannot be
/// fetched or parsed, or the download directory cannot be created. Per-item
/// failures are not errors; they are counted in the report.
pub async fn handle_run(cli: &Cli, config: AppConfig) -> Result<()> {
    let threads = cli.threads_or(config.download.threads);
    let config = config.with_threads(threads);

    let report = run_with_config(&config).await?;

    println!("{}", render_statistics(&report));
    Ok(())
}

/// The `Statistics:` block printed at the end of a run
pub fn render_statistics(report: &RunReport) -> String {
    format!("Statistics:\n{}", report)
}

/// Run the pipeline for a validated configuration and return its report
pub async fn run_with_config(config: &AppConfig) -> Result<RunReport> {
    config.validate()?;

    let client = config.client_config().build_http_client()?;

    let source = FeedSource::new(client.clone(), &config.feed.url)?;
    let feed = source.fetch().await.map_err(|e| {
        error!("Could not load feed {}: {}", config.feed.url, e);
        e
    })?;

    let directory = DownloadDirectory::ensure(config.download_dir()?).await?;
    info!(
        "Downloading '{}' into {} with batch size {}",
        feed.title,
        directory.root().display(),
        config.download.threads
    );

    let coordinator = Coordinator::new(config.coordinator_config(), directory, client)?;
    Ok(coordinator.process(&feed).await)
}
