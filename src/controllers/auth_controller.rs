use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterBrokerRequest};
use crate::models::user::{UserResponse, UserRole, UserStatus};
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    users: UserRepository,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Check credentials and issue a token
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(invalid)?;

        let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
        let matches = bcrypt::verify(&request.password, hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !matches {
            warn!("🔒 Failed login for {}", request.email);
            return Err(invalid());
        }

        if user.status != UserStatus::Active {
            return Err(AppError::Forbidden("Account is inactive".to_string()));
        }

        let (token, expires_at) = generate_token(user.id, &user.email, user.role, &self.jwt)?;
        self.users.touch_last_login(user.id).await?;

        info!("🔑 {} logged in as {}", user.email, user.role);

        let mut response = UserResponse::from(user);
        response.last_login = Some(Utc::now());

        Ok(LoginResponse {
            token,
            user: response,
            expires_at,
        })
    }

    /// Self-service broker sign-up. A taken email is a bad request here.
    pub async fn register_broker(
        &self,
        request: RegisterBrokerRequest,
    ) -> Result<UserResponse, AppError> {
        request.validate()?;

        if self.users.email_taken(&request.email, None).await? {
            return Err(AppError::BadRequest("Email is already registered".to_string()));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let user = self
            .users
            .create(NewUser {
                name: request.name.trim().to_string(),
                email: request.email.trim().to_string(),
                role: UserRole::Broker,
                status: UserStatus::Active,
                password_hash: Some(password_hash),
                join_date: Utc::now().date_naive(),
            })
            .await?;

        info!("🆕 Broker registered: {}", user.email);

        Ok(user.into())
    }
}
