//! Data structures for authentication-related entities.
//!
//! This module defines the request and response payloads for the login,
//! refresh, and session-introspection endpoints.

use crate::database::models::{Role, SubRole};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Path the user originally requested, carried through the login
    /// surface by the gate's `redirectTo` parameter.
    pub redirect_to: Option<String>,
}

/// Login response containing tokens and user info
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
    /// Token expiration in seconds
    pub expires_in: u64,
    /// Where the client should navigate after login.
    pub redirect_to: String,
}

/// User information returned in login and introspection responses
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub sub_role: Option<SubRole>,
}

/// Token refresh request
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}
