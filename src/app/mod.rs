//! Core application logic for Podcast Fetcher
//!
//! This module contains the download pipeline: feed parsing, the HTTP media
//! fetcher, title parsing, ID3 tagging, batch scheduling and the
//! coordinator that ties them together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use podcast_fetcher::app::{Feed, TitleParser};
//!
//! # fn example(xml: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let feed = Feed::parse(xml)?;
//! let parser = TitleParser::new();
//!
//! for item in feed.items.iter().filter(|item| item.is_downloadable()) {
//!     let parsed = parser.parse(&item.title, &item.author);
//!     println!("{}", parsed.file_name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod coordinator;
pub mod feed;
pub mod scheduler;
pub mod storage;
pub mod tagger;
pub mod title;

// Re-export main public API
pub use client::{ClientConfig, MediaFetcher};
pub use coordinator::{
    Coordinator, CoordinatorConfig, EpisodeJob, EpisodeOutcome, RunReport, RunStatistics,
};
pub use feed::{Enclosure, Feed, FeedItem, FeedSource};
pub use scheduler::{BatchScheduler, BatchSummary};
pub use storage::{default_download_dir, DownloadDirectory};
pub use tagger::{EpisodeTags, TagWriter};
pub use title::{ParsedTitle, TitleParser};
