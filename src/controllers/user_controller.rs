use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest};
use crate::models::user::{UserResponse, UserRole};
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::utils::errors::{conflict_error, forbidden_error, not_found_error, AppError};

pub struct UserController {
    repository: UserRepository,
}

fn hash_password(password: Option<&str>) -> Result<Option<String>, AppError> {
    match password.map(str::trim).filter(|p| !p.is_empty()) {
        Some(password) => bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map(Some)
            .map_err(|e| AppError::Hash(e.to_string())),
        None => Ok(None),
    }
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn list(&self, role: Option<UserRole>) -> Result<Vec<UserResponse>, AppError> {
        let users = match role {
            Some(role) => self.repository.find_by_role(role).await?,
            None => self.repository.find_all().await?,
        };

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserResponse, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| not_found_error("User", &id.to_string()))
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        if self.repository.email_taken(&request.email, None).await? {
            return Err(conflict_error("User", "email", &request.email));
        }

        let user = self
            .repository
            .create(NewUser {
                name: request.name.trim().to_string(),
                email: request.email.trim().to_string(),
                role: request.role.unwrap_or_default(),
                status: request.status.unwrap_or_default(),
                password_hash: hash_password(request.password.as_deref())?,
                join_date: request.join_date.unwrap_or_else(|| Utc::now().date_naive()),
            })
            .await?;

        info!("👤 User created: {} ({})", user.email, user.role);

        Ok(user.into())
    }

    pub async fn update(&self, id: Uuid, request: UpdateUserRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        if let Some(email) = request.email.as_deref() {
            if self.repository.email_taken(email, Some(id)).await? {
                return Err(conflict_error("User", "email", email));
            }
        }

        let password_hash = hash_password(request.password.as_deref())?;

        self.repository
            .update(id, request, password_hash)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| not_found_error("User", &id.to_string()))
    }

    /// Admin accounts cannot be deleted
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("User", &id.to_string()))?;

        if user.role == UserRole::Admin {
            return Err(forbidden_error("delete user", "admin accounts are protected"));
        }

        self.repository.delete(id).await?;
        info!("🗑️ User deleted: {}", user.email);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_password_is_not_hashed() {
        assert_eq!(hash_password(None).unwrap(), None);
        assert_eq!(hash_password(Some("   ")).unwrap(), None);
    }
}
