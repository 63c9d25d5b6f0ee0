//! HTTP client configuration and building logic
//!
//! One `reqwest::Client` is built per run and shared by the feed source, the
//! cover download and every episode download.

use reqwest::Client;

use crate::constants::http;
use crate::errors::{ConfigError, ConfigResult};

/// Configuration for the shared HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent sent with every request
    pub user_agent: String,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
    /// Maximum number of idle connections kept per host
    pub pool_max_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: http::USER_AGENT.to_string(),
            tcp_nodelay: true,
            pool_max_per_host: http::POOL_MAX_PER_HOST,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    ///
    /// No request timeout is configured: a transfer runs until the server
    /// finishes or fails it.
    pub fn build_http_client(&self) -> ConfigResult<Client> {
        Client::builder()
            .user_agent(self.user_agent.as_str())
            .tcp_nodelay(self.tcp_nodelay)
            .pool_max_idle_per_host(self.pool_max_per_host)
            .build()
            .map_err(ConfigError::HttpClient)
    }
}
