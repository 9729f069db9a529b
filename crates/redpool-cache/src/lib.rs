//! # redpool-cache
//!
//! Lazily built Redis connection pool on top of deadpool-redis.
//!
//! ## Features
//!
//! - **Connection Pool**: `RedisPool`, sized and time-bounded from `RedisSettings`
//! - **Lazy Holder**: `PoolHolder`, builds its pool exactly once on first acquisition
//! - **Process-wide Holder**: `acquire`, `set_port` and `port` free functions
//!
//! ## Example
//!
//! ```ignore
//! use redpool_cache::PoolHolder;
//! use redpool_common::RedisSettings;
//!
//! let holder = PoolHolder::new(RedisSettings::with_port(7000));
//! let mut conn = holder.acquire().await?;
//! redis::cmd("PING").query_async::<String>(&mut conn).await?;
//!
//! // Or through the process-wide holder
//! redpool_cache::set_port(7000);
//! let conn = redpool_cache::acquire().await?;
//! ```

pub mod holder;
pub mod pool;

pub use holder::{acquire, global, install, port, set_port, PoolHolder};
pub use pool::{RedisPool, RedisPoolError, RedisResult};

// Connection type handed out by the pool
pub use deadpool_redis::Connection;
pub use redpool_common::RedisSettings;
