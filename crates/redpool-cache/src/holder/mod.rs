//! Lazy pool holders.

mod global;
mod pool_holder;

pub use global::{acquire, global, install, port, set_port};
pub use pool_holder::PoolHolder;
