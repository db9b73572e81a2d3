//! Environment configuration
//!
//! Reads the service settings from process variables (after `.env` has been
//! loaded by `dotenvy` in `main`).

use anyhow::{bail, Context, Result};
use std::env;
use tracing::Level;

const DEV_JWT_SECRET: &str = "rs-car-point-dev-secret";
const DEFAULT_ADMIN_EMAIL: &str = "admin@admin.com";
const DEV_ADMIN_PASSWORD: &str = "admin123";

/// Service settings
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub redis_url: Option<String>,
    pub log_level: String,
    /// Account ensured at startup
    pub admin_email: String,
    /// No admin is bootstrapped when unset
    pub admin_password: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 8080,
            host: "0.0.0.0".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration: 86_400,
            cors_origins: Vec::new(),
            redis_url: None,
            log_level: "info".to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: Some(DEV_ADMIN_PASSWORD.to_string()),
        }
    }
}

impl EnvironmentConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let environment = get("ENVIRONMENT").unwrap_or(defaults.environment);

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", value))?,
            None => defaults.port,
        };

        let jwt_expiration = match get("JWT_EXPIRATION") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("JWT_EXPIRATION must be a number of seconds, got '{}'", value))?,
            None => defaults.jwt_expiration,
        };

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if environment == "production" => bail!("JWT_SECRET must be set in production"),
            None => defaults.jwt_secret,
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        // No default admin password in production
        let admin_password = match get("ADMIN_PASSWORD") {
            Some(password) => Some(password),
            None if environment == "production" => None,
            None => defaults.admin_password,
        };

        Ok(Self {
            environment,
            port,
            host: get("HOST").unwrap_or(defaults.host),
            jwt_secret,
            jwt_expiration,
            cors_origins,
            redis_url: get("REDIS_URL"),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            admin_email: get("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password,
        })
    }

    /// Running in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// `host:port` the server binds to
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Max level for the tracing subscriber, `INFO` when unparseable
    pub fn tracing_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<EnvironmentConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvironmentConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.server_url(), "0.0.0.0:8080");
        assert_eq!(config.jwt_expiration, 86_400);
        assert!(config.redis_url.is_none());
        assert!(config.is_development());
        assert_eq!(config.tracing_level(), Level::INFO);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "9090"),
            ("CORS_ORIGINS", "http://localhost:3003, http://localhost:3004,"),
            ("REDIS_URL", "redis://cache:6379"),
            ("LOG_LEVEL", "debug"),
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3003", "http://localhost:3004"]
        );
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.tracing_level(), Level::DEBUG);
    }

    #[test]
    fn test_invalid_port_fails() {
        assert!(load(&[("PORT", "eighty")]).is_err());
    }

    #[test]
    fn test_production_requires_secret() {
        assert!(load(&[("ENVIRONMENT", "production")]).is_err());
        let config = load(&[("ENVIRONMENT", "production"), ("JWT_SECRET", "s3cret")]).unwrap();
        assert!(config.is_production());
        assert_eq!(config.jwt_secret, "s3cret");
    }

    #[test]
    fn test_admin_account_settings() {
        let config = load(&[]).unwrap();
        assert_eq!(config.admin_email, "admin@admin.com");
        assert_eq!(config.admin_password.as_deref(), Some("admin123"));

        let config = load(&[("ENVIRONMENT", "production"), ("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.admin_password, None);

        let config = load(&[
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", "s3cret"),
            ("ADMIN_EMAIL", "owner@rscarpoint.lk"),
            ("ADMIN_PASSWORD", "changeme"),
        ])
        .unwrap();
        assert_eq!(config.admin_email, "owner@rscarpoint.lk");
        assert_eq!(config.admin_password.as_deref(), Some("changeme"));
    }
}
