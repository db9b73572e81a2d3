//! Admin account bootstrap
//!
//! Every admin-only route needs an admin token, and the only open sign-up
//! creates brokers. At startup the server makes sure the configured admin
//! account exists. An existing account with that email is left untouched.

use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::models::user::{UserRole, UserStatus};
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::utils::errors::AppError;

pub const ADMIN_NAME: &str = "Admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminBootstrap {
    Created(Uuid),
    Existing(Uuid),
    /// No admin password configured
    Skipped,
}

/// Create the configured admin account unless an account with that email
/// already exists. Safe to run on every start.
pub async fn ensure_admin(
    pool: &PgPool,
    config: &EnvironmentConfig,
) -> Result<AdminBootstrap, AppError> {
    let Some(password) = config.admin_password.as_deref() else {
        warn!("⚠️ ADMIN_PASSWORD not set, skipping admin bootstrap");
        return Ok(AdminBootstrap::Skipped);
    };

    let users = UserRepository::new(pool.clone());

    if let Some(existing) = users.find_by_email(&config.admin_email).await? {
        if existing.role != UserRole::Admin {
            warn!(
                "⚠️ {} exists with role {}, not promoting it",
                existing.email, existing.role
            );
        }
        info!("👤 Admin account already present: {}", existing.email);
        return Ok(AdminBootstrap::Existing(existing.id));
    }

    let password_hash =
        bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))?;

    let created = users
        .create(NewUser {
            name: ADMIN_NAME.to_string(),
            email: config.admin_email.trim().to_string(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            password_hash: Some(password_hash),
            join_date: Utc::now().date_naive(),
        })
        .await;

    match created {
        Ok(admin) => {
            info!("👤 Admin account created: {}", admin.email);
            Ok(AdminBootstrap::Created(admin.id))
        }
        // Another instance may have won the unique index
        Err(e) => match users.find_by_email(&config.admin_email).await? {
            Some(existing) => Ok(AdminBootstrap::Existing(existing.id)),
            None => Err(e),
        },
    }
}
