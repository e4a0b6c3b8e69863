//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_MET_BASE_URL: &str = "https://api.met.no";
const DEFAULT_USER_AGENT: &str = "forecast-cache/0.1 github.com/forecast-cache";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the MET Norway API
    pub met_base_url: String,
    /// User-Agent sent upstream; MET rejects anonymous clients
    pub user_agent: String,
    /// Maximum number of coordinates the cache can hold
    pub max_entries: usize,
    /// Absolute lifetime of a cached forecast in seconds
    pub cache_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MET_BASE_URL` - Upstream base URL (default: https://api.met.no)
    /// - `MET_USER_AGENT` - User-Agent header (default: forecast-cache/0.1 ...)
    /// - `MAX_ENTRIES` - Maximum cached coordinates (default: 1000)
    /// - `CACHE_TTL` - Absolute entry lifetime in seconds (default: 7200)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `UPSTREAM_TIMEOUT` - Upstream timeout in seconds (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            met_base_url: non_empty_var("MET_BASE_URL").unwrap_or(defaults.met_base_url),
            user_agent: non_empty_var("MET_USER_AGENT").unwrap_or(defaults.user_agent),
            max_entries: parsed_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cache_ttl: parsed_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            server_port: parsed_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parsed_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            upstream_timeout: parsed_var("UPSTREAM_TIMEOUT").unwrap_or(defaults.upstream_timeout),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            met_base_url: DEFAULT_MET_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_entries: 1000,
            cache_ttl: 7200,
            server_port: 3000,
            cleanup_interval: 60,
            upstream_timeout: 5,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
