use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::{UserRole, UserStatus};

/// Admin-side account creation. Role defaults to broker, status to active.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub join_date: Option<NaiveDate>,
    pub last_login: Option<DateTime<Utc>>,
    /// Blank passwords are ignored
    pub password: Option<String>,
}

/// Query string of `GET /api/users`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserQuery {
    pub role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_user_defaults() {
        let request: CreateUserRequest = serde_json::from_value(json!({
            "name": "Ruwan",
            "email": "ruwan@rscarpoint.lk"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(request.role.is_none());
        assert!(request.password.is_none());
    }

    #[test]
    fn test_update_user_validates_present_fields() {
        let request = UpdateUserRequest {
            email: Some("broken".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
        assert!(UpdateUserRequest::default().validate().is_ok());
    }
}
