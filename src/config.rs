//! Configuration management for Podcast Fetcher
//!
//! All settings have working defaults, so a config file is optional. When
//! one exists it is read from the first of these locations:
//!
//! 1. `./podcast-fetcher.toml`
//! 2. `<user config dir>/podcast-fetcher/config.toml`
//!
//! The `-t` command-line flag overrides `download.threads`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::storage::default_download_dir;
use crate::app::{ClientConfig, CoordinatorConfig};
use crate::constants::{config as config_constants, feed, http, tags, workers};
use crate::errors::{ConfigError, ConfigResult, StorageResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Feed source settings
    pub feed: FeedConfig,
    /// Tag values shared by all episodes
    pub tags: TagConfig,
    /// Download settings
    pub download: DownloadConfig,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Feed source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Feed URL
    pub url: String,
    /// Show name, used for the default download directory
    pub show_name: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: feed::DEFAULT_FEED_URL.to_string(),
            show_name: feed::DEFAULT_SHOW_NAME.to_string(),
        }
    }
}

/// Tag values shared by all episodes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    pub album: String,
    pub genre: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            album: tags::DEFAULT_ALBUM.to_string(),
            genre: tags::DEFAULT_GENRE.to_string(),
        }
    }
}

/// Download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Episodes downloaded concurrently per batch
    pub threads: usize,
    /// Download directory (None = `<home>/Music/Podcast/<show_name>`)
    pub directory: Option<PathBuf>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            threads: workers::DEFAULT_BATCH_SIZE,
            directory: None,
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    pub user_agent: String,
    pub tcp_nodelay: bool,
    pub pool_max_per_host: usize,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            user_agent: http::USER_AGENT.to_string(),
            tcp_nodelay: true,
            pool_max_per_host: http::POOL_MAX_PER_HOST,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: config_constants::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an explicit file or the standard locations
    ///
    /// Falls back to defaults when no file exists. An explicit path that
    /// does not exist is an error.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound { path }),
            Some(path) => Some(path),
            None => Self::find_config_file(),
        };

        let config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(config_constants::LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(
                config_dir
                    .join(config_constants::APP_DIR_NAME)
                    .join(config_constants::CONFIG_FILE_NAME),
            );
        }

        search_paths.into_iter().find(|path| {
            let found = path.exists();
            if found {
                debug!("Found config file: {}", path.display());
            }
            found
        })
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config: AppConfig = toml::from_str(&content)?;
        debug!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Apply the command-line batch size
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.download.threads = threads;
        self
    }

    /// Check values that would make a run impossible
    pub fn validate(&self) -> ConfigResult<()> {
        if self.download.threads == 0 {
            return Err(ConfigError::InvalidValue {
                field: "download.threads".to_string(),
                value: self.download.threads.to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if url::Url::parse(&self.feed.url).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "feed.url".to_string(),
                value: self.feed.url.clone(),
                reason: "Must be an absolute URL".to_string(),
            });
        }

        if self.feed.show_name.trim().is_empty() && self.download.directory.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "feed.show_name".to_string(),
                value: self.feed.show_name.clone(),
                reason: "Required when download.directory is not set".to_string(),
            });
        }

        Ok(())
    }

    /// Resolve the download directory
    pub fn download_dir(&self) -> StorageResult<PathBuf> {
        match &self.download.directory {
            Some(directory) => Ok(directory.clone()),
            None => default_download_dir(&self.feed.show_name),
        }
    }

    /// Runtime client configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            user_agent: self.client.user_agent.clone(),
            tcp_nodelay: self.client.tcp_nodelay,
            pool_max_per_host: self.client.pool_max_per_host,
        }
    }

    /// Runtime coordinator configuration
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            batch_size: self.download.threads,
            album: self.tags.album.clone(),
            genre: self.tags.genre.clone(),
            show_progress: true,
        }
    }
}
