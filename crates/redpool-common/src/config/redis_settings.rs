//! Redis connection and pool settings
//!
//! Loads settings from environment variables, falling back to defaults for
//! anything left unset.

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Port used when none is configured
pub const DEFAULT_PORT: u16 = 6379;

/// Hard max-wait applied on top of the configured one unless cleared
pub const DEFAULT_MAX_WAIT_OVERRIDE_MS: u64 = 5000;

/// Settings for a single Redis connection pool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedisSettings {
    #[serde(default = "default_server")]
    pub server: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub database: i64,
    /// Bounds connection establishment and the recycle `PING`
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    #[serde(default = "default_max_total")]
    pub max_total: usize,
    /// Idle connections above this are closed on the next acquisition;
    /// a pool left untouched after a burst keeps up to `max_total` open
    #[serde(default = "default_max_idle")]
    pub max_idle: usize,
    #[serde(default)]
    pub min_idle: usize,
    /// Configured wait for a free connection
    #[serde(default = "default_pool_max_wait_ms")]
    pub pool_max_wait_ms: u64,
    /// When set, replaces `pool_max_wait_ms` as the wait bound
    #[serde(default = "default_max_wait_override_ms")]
    pub max_wait_override_ms: Option<u64>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            server: default_server(),
            port: default_port(),
            database: 0,
            read_timeout_ms: default_read_timeout_ms(),
            max_total: default_max_total(),
            max_idle: default_max_idle(),
            min_idle: 0,
            pool_max_wait_ms: default_pool_max_wait_ms(),
            max_wait_override_ms: default_max_wait_override_ms(),
            password: None,
        }
    }
}

// Default value functions
fn default_server() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_read_timeout_ms() -> u64 {
    2000
}

fn default_max_total() -> usize {
    8
}

fn default_max_idle() -> usize {
    8
}

fn default_pool_max_wait_ms() -> u64 {
    3000
}

#[allow(clippy::unnecessary_wraps)]
fn default_max_wait_override_ms() -> Option<u64> {
    Some(DEFAULT_MAX_WAIT_OVERRIDE_MS)
}

impl RedisSettings {
    /// Default settings pointed at another port
    #[must_use]
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    /// Load settings from environment variables
    ///
    /// A `.env` file is read first if present.
    ///
    /// # Errors
    /// Returns an error if a variable is set but cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if a variable is present but cannot be parsed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        // Empty variables count as unset
        let lookup = |name: &str| lookup(name).filter(|raw| !raw.trim().is_empty());

        let max_wait_override_ms = match lookup("REDIS_MAX_WAIT_OVERRIDE_MS") {
            None => defaults.max_wait_override_ms,
            Some(raw) if matches!(raw.trim().to_lowercase().as_str(), "none" | "off") => None,
            Some(raw) => Some(parse_value("REDIS_MAX_WAIT_OVERRIDE_MS", &raw)?),
        };

        Ok(Self {
            server: lookup("REDIS_SERVER").unwrap_or(defaults.server),
            port: parse_var(&lookup, "REDIS_PORT")?.unwrap_or(defaults.port),
            database: parse_var(&lookup, "REDIS_DATABASE")?.unwrap_or(defaults.database),
            read_timeout_ms: parse_var(&lookup, "REDIS_READ_TIMEOUT_MS")?
                .unwrap_or(defaults.read_timeout_ms),
            max_total: parse_var(&lookup, "REDIS_MAX_TOTAL")?.unwrap_or(defaults.max_total),
            max_idle: parse_var(&lookup, "REDIS_MAX_IDLE")?.unwrap_or(defaults.max_idle),
            min_idle: parse_var(&lookup, "REDIS_MIN_IDLE")?.unwrap_or(defaults.min_idle),
            pool_max_wait_ms: parse_var(&lookup, "REDIS_POOL_MAX_WAIT_MS")?
                .unwrap_or(defaults.pool_max_wait_ms),
            max_wait_override_ms,
            password: lookup("REDIS_PASSWORD"),
        })
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    #[must_use]
    pub fn pool_max_wait(&self) -> Duration {
        Duration::from_millis(self.pool_max_wait_ms)
    }

    /// Wait bound actually applied to the pool
    ///
    /// The override wins over the configured value whenever it is set.
    #[must_use]
    pub fn effective_max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_override_ms.unwrap_or(self.pool_max_wait_ms))
    }

    /// Connection URL for logs; never carries the password
    #[must_use]
    pub fn redacted_url(&self) -> String {
        format!("redis://{}:{}/{}", self.server, self.port, self.database)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name).map(|raw| parse_value(name, &raw)).transpose()
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name, raw.to_string()))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
