//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default maximum number of entries when `limit` is unset.
pub const DEFAULT_LIMIT: u64 = 10_000;

/// Default access-based expiry in seconds.
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 300;

/// Default maximum encoded value size in bytes.
pub const DEFAULT_MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Shortest maintenance interval in seconds; 0 would spin the task.
pub const MIN_MAINTENANCE_INTERVAL: u64 = 1;

/// Memory cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Maximum number of entries; 0 falls back to [`DEFAULT_LIMIT`]
    pub limit: u64,
    /// Idle time after which an untouched entry expires; zero disables expiry
    pub expires_in: Duration,
    /// Largest encoded value the cache accepts, in bytes
    pub max_value_size: usize,
}

impl MemoryConfig {
    /// Creates a new MemoryConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMORY_LIMIT` - Maximum cache entries (default: 10000)
    /// - `MEMORY_EXPIRES_IN` - Access-based expiry in seconds (default: 300)
    /// - `MEMORY_MAX_VALUE_SIZE` - Maximum encoded value size in bytes (default: 1 MB)
    pub fn from_env() -> Self {
        Self {
            limit: env_or("MEMORY_LIMIT", DEFAULT_LIMIT),
            expires_in: Duration::from_secs(env_or(
                "MEMORY_EXPIRES_IN",
                DEFAULT_EXPIRES_IN_SECS,
            )),
            max_value_size: env_or("MEMORY_MAX_VALUE_SIZE", DEFAULT_MAX_VALUE_SIZE),
        }
    }

    /// Returns the configured limit, substituting the default for 0.
    pub fn effective_limit(&self) -> u64 {
        if self.limit > 0 {
            self.limit
        } else {
            DEFAULT_LIMIT
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            expires_in: Duration::from_secs(DEFAULT_EXPIRES_IN_SECS),
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
        }
    }
}

/// HTTP server configuration for the standalone binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP server port
    pub port: u16,
    /// Background maintenance interval in seconds
    pub maintenance_interval: u64,
}

impl ServerConfig {
    /// Creates a new ServerConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAINTENANCE_INTERVAL` - Maintenance frequency in seconds (default: 1, minimum: 1)
    pub fn from_env() -> Self {
        Self {
            port: env_or("SERVER_PORT", 3000),
            maintenance_interval: env_or("MAINTENANCE_INTERVAL", 1u64)
                .max(MIN_MAINTENANCE_INTERVAL),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            maintenance_interval: 1,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
