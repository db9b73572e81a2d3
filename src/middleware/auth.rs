//! JWT authentication middleware
//!
//! Verifies the bearer token and injects the caller as an
//! [`AuthenticatedUser`] extension. Role checks run after it and read that
//! extension.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    models::user::UserRole,
    state::AppState,
    utils::errors::AppError,
    utils::jwt::{extract_token_from_header, verify_token},
};

/// Caller injected into the request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins and brokers may record sales
    pub fn can_sell(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Broker)
    }

    /// Broker id to attribute new deals to, if the caller is a broker
    pub fn broker_id(&self) -> Option<Uuid> {
        (self.role == UserRole::Broker).then_some(self.user_id)
    }
}

/// Reject requests without a valid bearer token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.jwt_config())?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".to_string()))?;
    let role = UserRole::from_str(&claims.role)
        .ok_or_else(|| AppError::Unauthorized("Invalid role in token".to_string()))?;

    debug!("🔑 {} authenticated as {}", claims.email, role);

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
        role,
    });

    Ok(next.run(request).await)
}

/// Admins only
pub async fn admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Administrator permissions required".to_string()));
    }

    Ok(next.run(request).await)
}

/// Admins and brokers only
pub async fn seller_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.can_sell() {
        return Err(AppError::Forbidden("Broker or administrator permissions required".to_string()));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "someone@rscarpoint.lk".to_string(),
            role,
        }
    }

    #[test]
    fn test_role_helpers() {
        assert!(caller(UserRole::Admin).is_admin());
        assert!(caller(UserRole::Admin).can_sell());
        assert!(caller(UserRole::Broker).can_sell());
        assert!(!caller(UserRole::User).can_sell());

        let broker = caller(UserRole::Broker);
        assert_eq!(broker.broker_id(), Some(broker.user_id));
        assert_eq!(caller(UserRole::Admin).broker_id(), None);
    }
}
