//! Client-facing auth DTOs
//!
//! Request/response types shared between the server and API clients.

use serde::{Deserialize, Serialize};

use crate::role::UserRole;

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    /// Defaults to `ATTENDANT` when omitted.
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User information returned by auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

/// Token plus user info, returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}
