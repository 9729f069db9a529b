//! Process-wide pool holder.
//!
//! Callers that cannot thread a [`PoolHolder`] through their code use these
//! free functions. The holder is created on first touch with default settings
//! unless [`install`] ran earlier.

use std::sync::OnceLock;

use redpool_common::RedisSettings;

use super::PoolHolder;
use crate::pool::{RedisPoolError, RedisResult};

static GLOBAL: OnceLock<PoolHolder> = OnceLock::new();

/// Install settings for the process-wide holder
///
/// Must run before any other function in this module touches the holder.
pub fn install(settings: RedisSettings) -> RedisResult<&'static PoolHolder> {
    let mut installed = false;
    let holder = GLOBAL.get_or_init(|| {
        installed = true;
        PoolHolder::new(settings)
    });

    if installed {
        Ok(holder)
    } else {
        Err(RedisPoolError::AlreadyInstalled)
    }
}

/// The process-wide holder
pub fn global() -> &'static PoolHolder {
    GLOBAL.get_or_init(PoolHolder::default)
}

/// Set the port the process-wide pool will be built against
pub fn set_port(port: u16) {
    global().set_port(port);
}

/// Port the process-wide pool is configured with
#[must_use]
pub fn port() -> u16 {
    global().port()
}

/// Lease a connection from the process-wide pool
pub async fn acquire() -> RedisResult<deadpool_redis::Connection> {
    global().acquire().await
}
