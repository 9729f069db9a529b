//! Redis connection pool using deadpool-redis.
//!
//! Translates [`RedisSettings`] into a sized, time-bounded pool and adds the
//! idle bounds deadpool does not enforce on its own.

use deadpool_redis::{Config, Pool, Runtime};
use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use redpool_common::RedisSettings;

/// Error type for Redis pool operations
#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(String),

    /// The pool could not hand out a connection (exhausted, refused, timed out)
    #[error("redis client acquire failed: {0}")]
    Acquire(#[from] deadpool_redis::PoolError),

    #[error("Redis command error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Redis settings already installed for the process-wide pool")]
    AlreadyInstalled,
}

impl RedisPoolError {
    /// Whether this failure came from leasing a connection
    #[must_use]
    pub fn is_acquire(&self) -> bool {
        matches!(self, Self::Acquire(_))
    }
}

/// Result type for Redis pool operations
pub type RedisResult<T> = Result<T, RedisPoolError>;

/// Managed Redis connection pool
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
    settings: RedisSettings,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("url", &self.settings.redacted_url())
            .field("status", &self.pool.status())
            .finish()
    }
}

impl RedisPool {
    /// Create a new Redis pool with the given settings
    ///
    /// No connection is opened here; see [`RedisPool::warm_up`].
    pub fn new(settings: RedisSettings) -> RedisResult<Self> {
        let cfg = Config::from_connection_info(connection_info(&settings));
        let pool = cfg
            .builder()
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?
            .max_size(settings.max_total)
            .wait_timeout(Some(settings.effective_max_wait()))
            .create_timeout(Some(settings.read_timeout()))
            .recycle_timeout(Some(settings.read_timeout()))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?;

        tracing::info!(
            url = %settings.redacted_url(),
            max_total = settings.max_total,
            max_idle = settings.max_idle,
            min_idle = settings.min_idle,
            max_wait_ms = settings.effective_max_wait().as_millis(),
            "Redis pool created"
        );

        Ok(Self { pool, settings })
    }

    /// Settings this pool was built with
    #[must_use]
    pub fn settings(&self) -> &RedisSettings {
        &self.settings
    }

    /// Get a connection from the pool
    ///
    /// Waits at most the effective max-wait for a free slot.
    pub async fn get(&self) -> RedisResult<deadpool_redis::Connection> {
        self.trim_idle();
        self.pool.get().await.map_err(RedisPoolError::Acquire)
    }

    /// Open `min_idle` connections and hand them back to the pool
    ///
    /// Returns the number of connections that were opened. A failure stops
    /// the warm-up early but is not an error: the next `get` will report it.
    pub async fn warm_up(&self) -> usize {
        let target = self.settings.min_idle.min(self.settings.max_total);
        let mut held = Vec::with_capacity(target);

        while held.len() < target {
            match self.pool.get().await {
                Ok(conn) => held.push(conn),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        opened = held.len(),
                        min_idle = target,
                        "Redis pool warm-up stopped early"
                    );
                    break;
                }
            }
        }

        held.len()
    }

    /// Close idle connections above `max_idle`
    ///
    /// Runs at the start of every `get`; nothing trims a pool that is not
    /// being used. Returns the number of connections dropped.
    pub fn trim_idle(&self) -> usize {
        let max_idle = self.settings.max_idle;
        if self.pool.status().available <= max_idle {
            return 0;
        }

        let mut kept = 0;
        let result = self.pool.retain(|_, _| {
            kept += 1;
            kept <= max_idle
        });

        let removed = result.removed.len();
        if removed > 0 {
            tracing::debug!(removed, max_idle, "Trimmed idle Redis connections");
        }
        removed
    }

    /// Get the current pool status
    #[must_use]
    pub fn status(&self) -> deadpool_redis::Status {
        self.pool.status()
    }

    /// Check if the pool is healthy by pinging Redis
    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.get().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}

/// Structured address so credentials never go through URL parsing
fn connection_info(settings: &RedisSettings) -> ConnectionInfo {
    ConnectionInfo {
        addr: ConnectionAddr::Tcp(settings.server.clone(), settings.port),
        redis: RedisConnectionInfo {
            db: settings.database,
            password: settings.password.clone(),
            ..RedisConnectionInfo::default()
        },
    }
}
