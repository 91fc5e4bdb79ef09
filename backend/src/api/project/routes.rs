//! Defines the HTTP routes for projects.

use super::handlers::{create_project, get_project, get_projects_by_client};
use crate::auth::middleware::{admin_auth, jwt_auth};
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn project_router() -> Router {
    Router::new()
        .route(
            "/",
            post(create_project).layer(middleware::from_fn(admin_auth)),
        )
        .route("/{id}", get(get_project))
        .route("/client/{client_id}", get(get_projects_by_client))
        .layer(middleware::from_fn(jwt_auth))
}
