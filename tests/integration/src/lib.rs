//! Integration test helpers for redpool
//!
//! These tests require a running Redis server. Set `REDIS_SERVER` (and
//! `REDIS_PORT` if it is not 6379) before running:
//!
//! ```bash
//! export REDIS_SERVER=127.0.0.1
//! cargo test -p integration-tests
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use redpool_common::{try_init_tracing, RedisSettings};

/// Settings for the live test server, or `None` when none is configured
///
/// # Panics
/// Panics if `REDIS_SERVER` is set but the other `REDIS_*` variables do not parse.
pub fn live_settings() -> Option<RedisSettings> {
    let _ = dotenvy::dotenv();
    // Every test calls this; only the first install wins
    let _ = try_init_tracing();
    settings_if_configured(|name| std::env::var(name).ok())
}

fn settings_if_configured<F>(lookup: F) -> Option<RedisSettings>
where
    F: Fn(&str) -> Option<String>,
{
    lookup("REDIS_SERVER")?;
    match RedisSettings::from_lookup(lookup) {
        Ok(settings) => Some(settings),
        Err(e) => panic!("REDIS_SERVER is set but the Redis test settings are invalid: {e}"),
    }
}

/// Unique key for a test run
pub fn test_key(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!(
        "redpool:test:{prefix}:{}:{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_server_skips() {
        assert!(settings_if_configured(|_| None).is_none());
    }

    #[test]
    fn test_server_with_valid_settings() {
        let settings = settings_if_configured(|name| match name {
            "REDIS_SERVER" => Some("10.0.0.5".to_string()),
            "REDIS_PORT" => Some("6390".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.server, "10.0.0.5");
        assert_eq!(settings.port, 6390);
    }

    #[test]
    #[should_panic(expected = "Invalid value for REDIS_PORT")]
    fn test_server_with_bad_port_panics() {
        let _ = settings_if_configured(|name| match name {
            "REDIS_SERVER" => Some("127.0.0.1".to_string()),
            "REDIS_PORT" => Some("not-a-port".to_string()),
            _ => None,
        });
    }
}
