//! HTTP client for media downloads
//!
//! The module is organized into:
//! - `config`: HTTP client configuration and building
//! - `download`: streaming transfers into local files

use std::path::Path;
use std::sync::Arc;

use reqwest::Client;

use crate::app::coordinator::stats::RunStatistics;
use crate::errors::DownloadResult;

pub mod config;
pub mod download;

pub use config::ClientConfig;

/// Downloads single media files and counts successful transfers
#[derive(Debug, Clone)]
pub struct MediaFetcher {
    client: Client,
    stats: Arc<RunStatistics>,
}

impl MediaFetcher {
    /// Creates a fetcher that records successful downloads into `stats`
    pub fn new(client: Client, stats: Arc<RunStatistics>) -> Self {
        Self { client, stats }
    }

    /// Downloads `url` to `destination`, overwriting any existing file
    ///
    /// Increments the shared download counter exactly once on success.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the URL is invalid, the file cannot be
    /// created, the request fails or the body cannot be copied.
    pub async fn fetch(&self, url: &str, destination: &Path) -> DownloadResult<u64> {
        let url = download::parse_url(url)?;
        let bytes = download::stream_to_file(&self.client, &url, destination).await?;
        self.stats.record_download();
        tracing::info!("Downloaded {} ({} bytes)", destination.display(), bytes);
        Ok(bytes)
    }
}
