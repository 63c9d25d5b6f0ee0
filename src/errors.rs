//! Error types for Podcast Fetcher
//!
//! Errors are split by concern. Feed, storage and configuration errors are
//! fatal for a run; download and tag errors are recovered inside the task
//! that produced them and only ever show up as a log line and a counter.

use std::path::PathBuf;
use thiserror::Error;

/// Feed retrieval and parsing errors
#[derive(Error, Debug)]
pub enum FeedError {
    /// HTTP request for the feed failed
    #[error("Failed to fetch feed: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed URL could not be parsed
    #[error("Invalid feed URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Feed server answered with a non-success status
    #[error("Feed server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Feed body is not a readable RSS document
    #[error("Failed to parse feed: {reason}")]
    Parse { reason: String },
}

/// Media download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error during file operations
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Server returned error status
    #[error("Server error: HTTP {status} for {url}")]
    ServerError { status: u16, url: String },
}

/// ID3 tag writing errors
#[derive(Error, Debug)]
pub enum TagError {
    /// Reading or writing the tag failed
    #[error("ID3 tag error for {path}: {source}")]
    Id3 {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },

    /// The blocking tag task did not complete
    #[error("Tag writer task failed: {reason}")]
    TaskFailed { reason: String },
}

/// Download directory errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Home directory could not be determined
    #[error("Could not determine the home directory")]
    HomeDirNotFound,

    /// Download directory could not be created
    #[error("Failed to create download directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path exists but is not a directory
    #[error("Download path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// HTTP client could not be built from the configuration
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Batch scheduling errors
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Batch size must be at least one
    #[error("Batch size must be greater than 0")]
    ZeroBatchSize,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Feed error
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Tag error
    #[error(transparent)]
    Tag(#[from] TagError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Scheduler error
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Whether the error ends the whole run rather than a single item
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::Download(_) | AppError::Tag(_))
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Feed(_) => "feed",
            AppError::Download(_) => "download",
            AppError::Tag(_) => "tag",
            AppError::Storage(_) => "storage",
            AppError::Config(_) => "config",
            AppError::Scheduler(_) => "scheduler",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Feed result type alias
pub type FeedResult<T> = std::result::Result<T, FeedError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Tag result type alias
pub type TagResult<T> = std::result::Result<T, TagError>;

/// Storage result type alias
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Config result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
