//! Defines the HTTP routes for meeting scheduling.

use super::handlers::{cancel_meeting, get_meeting, get_meetings_by_project, schedule_meeting};
use crate::auth::middleware::{admin_auth, jwt_auth};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

pub fn meeting_router() -> Router {
    Router::new()
        .route(
            "/",
            post(schedule_meeting).layer(middleware::from_fn(admin_auth)),
        )
        .route(
            "/{id}/cancel",
            put(cancel_meeting).layer(middleware::from_fn(admin_auth)),
        )
        .route("/{id}", get(get_meeting))
        .route("/project/{project_id}", get(get_meetings_by_project))
        .layer(middleware::from_fn(jwt_auth))
}
