//! Shared application state
//!
//! State handed to every axum handler. Cheap to clone: the pool and the
//! notifier are both handles.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::status_notifier::StatusNotifier;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub notifier: StatusNotifier,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, notifier: StatusNotifier) -> Self {
        Self {
            pool,
            config,
            notifier,
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::from(&self.config)
    }
}
