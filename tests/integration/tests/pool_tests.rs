//! Live Redis tests for the lazy pool holder
//!
//! Skipped unless `REDIS_SERVER` is set.

use std::time::{Duration, Instant};

use anyhow::Result;
use integration_tests::{live_settings, test_key};
use redis::AsyncCommands;
use redpool_cache::{PoolHolder, RedisPool};
use redpool_common::RedisSettings;

#[tokio::test]
async fn test_acquire_returns_usable_connection() -> Result<()> {
    let Some(settings) = live_settings() else {
        eprintln!("Skipping test: REDIS_SERVER not set");
        return Ok(());
    };
    let holder = PoolHolder::new(settings);

    let key = test_key("acquire");
    let mut conn = holder.acquire().await?;
    conn.set_ex::<_, _, ()>(&key, "pooled", 30).await?;
    let value: Option<String> = conn.get(&key).await?;
    conn.del::<_, ()>(&key).await?;

    assert_eq!(value.as_deref(), Some("pooled"));
    assert!(holder.is_initialized());
    Ok(())
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let Some(settings) = live_settings() else {
        eprintln!("Skipping test: REDIS_SERVER not set");
        return Ok(());
    };

    PoolHolder::new(settings).health_check().await?;
    Ok(())
}

#[tokio::test]
async fn test_exhausted_pool_times_out_within_max_wait() -> Result<()> {
    let Some(settings) = live_settings() else {
        eprintln!("Skipping test: REDIS_SERVER not set");
        return Ok(());
    };
    let holder = PoolHolder::new(RedisSettings {
        max_total: 1,
        max_wait_override_ms: Some(200),
        ..settings
    });

    let _held = holder.acquire().await?;
    let started = Instant::now();
    let err = holder.acquire().await.err().unwrap();

    assert!(err.is_acquire());
    assert!(started.elapsed() < Duration::from_secs(2));
    Ok(())
}

#[tokio::test]
async fn test_min_idle_connections_opened_on_build() -> Result<()> {
    let Some(settings) = live_settings() else {
        eprintln!("Skipping test: REDIS_SERVER not set");
        return Ok(());
    };
    let holder = PoolHolder::new(RedisSettings {
        min_idle: 3,
        ..settings
    });

    let _conn = holder.acquire().await?;
    let status = holder.status().expect("pool built");
    assert!(status.size >= 3);
    Ok(())
}

#[tokio::test]
async fn test_idle_connections_trimmed_to_max_idle() -> Result<()> {
    let Some(settings) = live_settings() else {
        eprintln!("Skipping test: REDIS_SERVER not set");
        return Ok(());
    };
    let pool = RedisPool::new(RedisSettings {
        max_total: 4,
        max_idle: 1,
        ..settings
    })?;

    let held = vec![pool.get().await?, pool.get().await?, pool.get().await?];
    drop(held);
    assert_eq!(pool.status().available, 3);

    assert_eq!(pool.trim_idle(), 2);
    assert_eq!(pool.status().available, 1);
    Ok(())
}
