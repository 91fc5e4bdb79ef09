//! Defines the HTTP routes for user management.

use super::handlers::{create_user, get_user, get_users};
use crate::auth::middleware::{admin_auth, jwt_auth};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn user_router() -> Router {
    Router::new()
        .route("/", post(create_user).get(get_users))
        .route("/{id}", get(get_user))
        .layer(middleware::from_fn(admin_auth))
        .layer(middleware::from_fn(jwt_auth))
}
