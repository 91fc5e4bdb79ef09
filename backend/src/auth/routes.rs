//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle login, logout, token refresh, and session
//! introspection, and are designed to be integrated into the main router.

use crate::auth::handlers::*;
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .route("/me", get(me).layer(middleware::from_fn(jwt_auth)))
}
