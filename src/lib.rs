//! Podcast Fetcher Library
//!
//! Downloads a podcast feed's episodes and cover art in fixed-size
//! concurrent batches and writes ID3 tags derived from the feed entries.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
