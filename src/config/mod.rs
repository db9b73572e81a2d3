//! Service configuration
//!
//! Database pool settings and the environment-driven service settings.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::EnvironmentConfig;
