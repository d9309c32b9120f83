use crate::types::RedisConfig;

pub mod slip;

pub use slip::{SlipStore, SLIP_KEY, SLIP_SCHEMA_VERSION};

/// Create a Redis client using the provided config.
///
/// The returned client can be turned into an async connection manager by
/// downstream components when needed.
pub fn create_redis_client(cfg: &RedisConfig) -> anyhow::Result<redis::Client> {
    let client = redis::Client::open(cfg.url.as_str())?;
    Ok(client)
}
