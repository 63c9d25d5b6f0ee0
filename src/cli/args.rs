//! Command-line argument parsing for Podcast Fetcher
//!
//! The tool has a single optional flag: `-t`, the number of episodes
//! downloaded concurrently per batch.

use clap::Parser;

/// Podcast Fetcher - download a podcast and tag its episodes
#[derive(Parser, Debug, Clone)]
#[command(
    name = "podcast_fetcher",
    version,
    about = "Download every episode of a podcast feed and write ID3 tags",
    long_about = "Downloads the show's cover and every episode enclosure in fixed-size concurrent batches,
then writes title, artist, album, genre and year tags taken from the feed."
)]
pub struct Cli {
    /// Threads to simultaneously download media files [default: 4]
    #[arg(short = 't', value_name = "N", value_parser = parse_threads)]
    pub threads: Option<usize>,
}

/// Parse the batch size, which must be at least one
fn parse_threads(value: &str) -> Result<usize, String> {
    let threads: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;

    if threads == 0 {
        return Err("must be at least 1".to_string());
    }

    Ok(threads)
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Batch size to use, falling back to the configured one
    pub fn threads_or(&self, configured: usize) -> usize {
        self.threads.unwrap_or(configured)
    }
}
