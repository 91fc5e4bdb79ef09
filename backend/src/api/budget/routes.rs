//! Defines the HTTP routes for budget management.

use super::handlers::{
    create_budget, delete_budget, get_budget, get_budgets_by_lead, update_budget_status,
};
use crate::auth::middleware::{admin_auth, jwt_auth};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

pub fn budget_router() -> Router {
    Router::new()
        .route("/", post(create_budget))
        .route("/{id}", get(get_budget).delete(delete_budget))
        .route("/{id}/status", put(update_budget_status))
        .route("/lead/{lead_id}", get(get_budgets_by_lead))
        .layer(middleware::from_fn(admin_auth))
        .layer(middleware::from_fn(jwt_auth))
}
