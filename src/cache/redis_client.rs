use anyhow::Result;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use tracing::{debug, error, info};

use super::CacheConfig;
use crate::services::status_notifier::SignalStore;

/// Redis client over a connection manager
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
    config: CacheConfig,
}

impl RedisClient {
    /// Connect and verify with a PING
    pub async fn new(config: CacheConfig) -> Result<Self> {
        info!("🔗 Connecting to Redis: {}", config.redis_url);

        let client = redis::Client::open(config.redis_url.clone())?;
        let manager = ConnectionManager::new(client).await?;

        let mut conn = manager.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis connected");

        Ok(Self { manager, config })
    }

    /// Key with the configured prefix
    fn make_key(&self, prefix: &str, identifier: &str) -> String {
        build_key(&self.config.key_prefix, prefix, identifier)
    }

    /// Key holding the last vehicle status change
    pub fn signal_key(&self) -> String {
        self.make_key("signal", "vehicle_status_changed")
    }
}

fn build_key(namespace: &str, prefix: &str, identifier: &str) -> String {
    format!("{}:{}:{}", namespace, prefix, identifier)
}

#[async_trait]
impl SignalStore for RedisClient {
    async fn write_signal(&self, value: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        let key = self.signal_key();

        let result: RedisResult<()> = conn.set(&key, value).await;

        match result {
            Ok(()) => {
                debug!("💾 Signal SET {} = {}", key, value);
                Ok(())
            }
            Err(e) => {
                error!("❌ Error writing signal {}: {}", key, e);
                Err(anyhow::anyhow!("Redis error: {}", e))
            }
        }
    }

    async fn read_signal(&self) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let key = self.signal_key();

        let value: Option<String> = conn.get(&key).await?;
        debug!("📥 Signal GET {}: {:?}", key, value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_key_layout() {
        let config = CacheConfig::default();
        assert_eq!(
            build_key(&config.key_prefix, "signal", "vehicle_status_changed"),
            "rs_car_point:signal:vehicle_status_changed"
        );
    }
}
