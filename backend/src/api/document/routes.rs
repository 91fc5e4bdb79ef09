//! Defines the HTTP routes for document metadata.

use super::handlers::{
    delete_document, get_document, get_documents_by_project, register_document,
};
use crate::auth::middleware::{admin_auth, jwt_auth};
use axum::{
    Router,
    handler::Handler,
    middleware,
    routing::{get, post},
};

pub fn document_router() -> Router {
    Router::new()
        .route(
            "/",
            post(register_document).layer(middleware::from_fn(admin_auth)),
        )
        .route(
            "/{id}",
            get(get_document).delete(delete_document.layer(middleware::from_fn(admin_auth))),
        )
        .route("/project/{project_id}", get(get_documents_by_project))
        .layer(middleware::from_fn(jwt_auth))
}
