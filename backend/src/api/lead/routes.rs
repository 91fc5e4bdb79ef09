//! Defines the HTTP routes for lead tracking.

use super::handlers::{create_lead, delete_lead, get_lead, get_leads, update_lead_status};
use crate::auth::middleware::{admin_auth, jwt_auth};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

pub fn lead_router() -> Router {
    Router::new()
        .route("/", post(create_lead).get(get_leads))
        .route("/{id}", get(get_lead).delete(delete_lead))
        .route("/{id}/status", put(update_lead_status))
        .layer(middleware::from_fn(admin_auth))
        .layer(middleware::from_fn(jwt_auth))
}
