//! # redpool-common
//!
//! Shared utilities for the redpool crates: Redis connection settings,
//! configuration errors, and tracing setup.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{ConfigError, RedisSettings, DEFAULT_MAX_WAIT_OVERRIDE_MS, DEFAULT_PORT};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
