//! Configuration structs

mod redis_settings;

pub use redis_settings::{
    ConfigError, RedisSettings, DEFAULT_MAX_WAIT_OVERRIDE_MS, DEFAULT_PORT,
};
