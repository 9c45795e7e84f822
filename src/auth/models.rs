//! Authentication Models
//! Mission: Define user, role and token claim data structures

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: UserRole,
    pub created_at: String,
}

/// User roles for RBAC
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[serde(rename = "ROLE_ADMIN")]
    Admin, // Full access, including /api/admin
    #[serde(rename = "ROLE_USER")]
    User, // Access to authenticated endpoints only
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Admin => "ROLE_ADMIN",
            UserRole::User => "ROLE_USER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ROLE_ADMIN" => Some(UserRole::Admin),
            "ROLE_USER" => Some(UserRole::User),
            _ => None,
        }
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (username)
    pub role: UserRole,
    pub iat: usize, // issued-at timestamp
    pub exp: usize, // expiration timestamp
}

/// Login form body (application/x-www-form-urlencoded)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}
