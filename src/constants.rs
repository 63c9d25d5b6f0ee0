//! Application constants for Podcast Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

/// Feed source defaults
pub mod feed {
    /// Well-known feed of the default show
    pub const DEFAULT_FEED_URL: &str = "https://golangshow.com/index.xml";

    /// Show name used for the download directory
    pub const DEFAULT_SHOW_NAME: &str = "GolangShow";
}

/// Values written into every episode's ID3 tag
pub mod tags {
    /// Album written for every episode
    pub const DEFAULT_ALBUM: &str = "GolangShow";

    /// Genre written for every episode
    pub const DEFAULT_GENRE: &str = "Technology";
}

/// HTTP client configuration constants
pub mod http {
    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("Podcast-Fetcher/", env!("CARGO_PKG_VERSION"));

    /// Maximum idle connections kept per host in the pool
    pub const POOL_MAX_PER_HOST: usize = 16;
}

/// Batch scheduling defaults
pub mod workers {
    /// Default number of episodes downloaded concurrently per batch
    pub const DEFAULT_BATCH_SIZE: usize = 4;
}

/// File naming and layout
pub mod files {
    /// File name of the show's cover art inside the download directory
    pub const COVER_FILE_NAME: &str = "cover.png";

    /// Extension of downloaded episode files
    pub const EPISODE_EXTENSION: &str = "mp3";

    /// Path segments below the home directory
    pub const MUSIC_DIR: &str = "Music";
    pub const PODCAST_DIR: &str = "Podcast";

    /// Permissions of the download directory when it is created (Unix only)
    #[cfg(unix)]
    pub const DOWNLOAD_DIR_PERMISSIONS: u32 = 0o755;
}

/// Configuration file discovery
pub mod config {
    /// Directory name under the user config directory
    pub const APP_DIR_NAME: &str = "podcast-fetcher";

    /// Config file name inside `APP_DIR_NAME`
    pub const CONFIG_FILE_NAME: &str = "config.toml";

    /// Project-local config file checked before the user config
    pub const LOCAL_CONFIG_FILE: &str = "./podcast-fetcher.toml";

    /// Log level used when the config does not name one
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

// Re-export commonly used constants at the top level
pub use feed::DEFAULT_FEED_URL;
pub use http::USER_AGENT;
pub use workers::DEFAULT_BATCH_SIZE;
