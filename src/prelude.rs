//! Prelude module for Podcast Fetcher Library
//!
//! Re-exports the items needed to run the pipeline with a single
//! `use podcast_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use podcast_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?;
//!     let report = run_with_config(&config).await?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Pipeline components
pub use crate::app::{
    BatchScheduler, BatchSummary, ClientConfig, Coordinator, CoordinatorConfig,
    DownloadDirectory, Feed, FeedItem, FeedSource, MediaFetcher, RunReport, RunStatistics,
    TagWriter, TitleParser,
};

// Configuration and entry points
pub use crate::cli::run_with_config;
pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_FEED_URL, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

pub use tokio;
