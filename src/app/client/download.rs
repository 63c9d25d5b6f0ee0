//! Streaming file downloads
//!
//! A download creates (or truncates) the destination first, then streams the
//! response body into it chunk by chunk. A failed transfer leaves whatever
//! was written so far in place.

use std::path::Path;

use futures::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::errors::{DownloadError, DownloadResult};

/// Parse a download URL
pub fn parse_url(url: &str) -> DownloadResult<Url> {
    Url::parse(url).map_err(|e| DownloadError::InvalidUrl {
        url: url.to_string(),
        error: e.to_string(),
    })
}

/// Streams `url` into `destination`, returning the number of bytes written
///
/// # Errors
///
/// Returns `DownloadError` if:
/// - The destination file cannot be created
/// - The HTTP request fails or the server answers with a non-success status
/// - Reading the body or writing the file fails
pub async fn stream_to_file(client: &Client, url: &Url, destination: &Path) -> DownloadResult<u64> {
    let mut file = File::create(destination).await?;

    let response = client.get(url.as_str()).send().await?;
    if !response.status().is_success() {
        return Err(DownloadError::ServerError {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    let mut written = 0u64;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    tracing::debug!("Wrote {} bytes to {}", written, destination.display());
    Ok(written)
}
