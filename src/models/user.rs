//! User model
//!
//! Account record for admins, brokers and plain users. The password hash is
//! only ever read by the auth controller and never serialized.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Account role - maps to ENUM user_role
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    #[default]
    Broker,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Broker => "broker",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Some(UserRole::User),
            "broker" => Some(UserRole::Broker),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status - maps to ENUM user_status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

/// Row of the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub password_hash: Option<String>,
    pub join_date: NaiveDate,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// User as returned by the API (no password)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
            join_date: Some(user.join_date),
            last_login: user.last_login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::from_str("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_str("broker"), Some(UserRole::Broker));
        assert_eq!(UserRole::from_str("driver"), None);
    }

    #[test]
    fn test_response_hides_password() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Nimal Perera".to_string(),
            email: "nimal@rscarpoint.lk".to_string(),
            role: UserRole::Broker,
            status: UserStatus::Active,
            password_hash: Some("$2b$12$hash".to_string()),
            join_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            last_login: None,
            created_at: Utc::now(),
        };

        let body = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(body.get("passwordHash").is_none());
        assert_eq!(body["role"], "broker");
        assert_eq!(body["joinDate"], "2024-01-10");
    }
}
