//! Cache
//!
//! Redis-backed shared storage for the status-change sentinel.

pub mod cache_config;
pub mod redis_client;

pub use cache_config::CacheConfig;
pub use redis_client::RedisClient;
