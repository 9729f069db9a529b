//! Lazily built Redis pool.
//!
//! The pool is constructed on the first `acquire` using whatever port is
//! configured at that moment, and is kept for the holder's lifetime.

use std::sync::atomic::{AtomicU16, Ordering};

use redpool_common::{ConfigError, RedisSettings};
use tokio::sync::OnceCell;

use crate::pool::{RedisPool, RedisPoolError, RedisResult};

/// Owns at most one [`RedisPool`] and hands out connections from it
#[derive(Debug)]
pub struct PoolHolder {
    settings: RedisSettings,
    port: AtomicU16,
    pool: OnceCell<RedisPool>,
}

impl Default for PoolHolder {
    fn default() -> Self {
        Self::new(RedisSettings::default())
    }
}

impl PoolHolder {
    /// Create a holder; no pool is built until the first acquisition
    #[must_use]
    pub fn new(settings: RedisSettings) -> Self {
        Self {
            port: AtomicU16::new(settings.port),
            settings,
            pool: OnceCell::new(),
        }
    }

    /// Create a holder from `REDIS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(RedisSettings::from_env()?))
    }

    /// Change the port used when the pool gets built
    ///
    /// Has no effect on a pool that already exists.
    pub fn set_port(&self, port: u16) {
        self.port.store(port, Ordering::SeqCst);

        if let Some(pool) = self.pool.get() {
            tracing::warn!(
                requested = port,
                active = pool.settings().port,
                "Redis pool already built; port change applies to no live pool"
            );
        }
    }

    /// Currently configured port
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.load(Ordering::SeqCst)
    }

    /// Whether the pool has been built
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.pool.initialized()
    }

    /// Settings the live pool was built with
    #[must_use]
    pub fn active_settings(&self) -> Option<&RedisSettings> {
        self.pool.get().map(RedisPool::settings)
    }

    /// Status of the live pool, if any
    #[must_use]
    pub fn status(&self) -> Option<deadpool_redis::Status> {
        self.pool.get().map(RedisPool::status)
    }

    /// Lease a connection, building the pool first if needed
    ///
    /// Failures are logged and returned unchanged; there is no retry.
    pub async fn acquire(&self) -> RedisResult<deadpool_redis::Connection> {
        let pool = self.pool().await?;

        pool.get().await.map_err(|e| {
            tracing::error!(
                error = %e,
                details = ?e,
                url = %pool.settings().redacted_url(),
                "redis client acquire failed"
            );
            e
        })
    }

    /// Ping Redis through a pooled connection
    pub async fn health_check(&self) -> RedisResult<()> {
        self.pool().await?.health_check().await
    }

    async fn pool(&self) -> RedisResult<&RedisPool> {
        self.pool
            .get_or_try_init(|| async {
                let settings = RedisSettings {
                    port: self.port(),
                    ..self.settings.clone()
                };

                let pool = RedisPool::new(settings).map_err(|e| {
                    tracing::error!(error = %e, "Failed to build Redis pool");
                    e
                })?;
                pool.warm_up().await;
                Ok::<_, RedisPoolError>(pool)
            })
            .await
    }
}
