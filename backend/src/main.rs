//! Main entry point for the Atrio backend.
//!
//! This file initializes the Axum web server, sets up database connections,
//! and registers all API routes and middleware.
//! It orchestrates the application's startup and defines its overall structure.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::api::common::ApiResponse;
use crate::auth::middleware::session_gate;
use crate::services::email_service::EmailService;
use crate::services::video_host::{VideoHost, VimeoClient};
use crate::services::video_upload::VideoUploader;
use crate::utils::jwt::JwtUtils;
use axum::{Extension, Router, middleware, response::Json, routing::get};
use config::Config;
use database::Database;
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let db = Database::new(&config).await.unwrap();
    let pool = db.pool().clone();

    let jwt_utils = JwtUtils::new(&config);
    let video_host: Arc<dyn VideoHost> =
        Arc::new(VimeoClient::new(config.video_host.clone()).unwrap());
    let mailer = Arc::new(EmailService::new(config.email.clone()).unwrap());
    let uploader = Arc::new(VideoUploader::new(
        video_host.clone(),
        pool.clone(),
        config.video_host.playback_base_url.clone(),
        tokio_util::sync::CancellationToken::new(),
    ));

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/login", get(login_screen))
        .route("/crm", get(crm_screen))
        .route("/crm/{*screen}", get(crm_screen))
        .route("/portal", get(portal_screen))
        .route("/portal/{*screen}", get(portal_screen))
        .nest("/auth", auth::routes::auth_router())
        .nest("/api/lead", api::lead::routes::lead_router())
        .nest("/api/budget", api::budget::routes::budget_router())
        .nest("/api/meeting", api::meeting::routes::meeting_router())
        .nest("/api/document", api::document::routes::document_router())
        .nest("/api/project", api::project::routes::project_router())
        .nest("/api/user", api::user::routes::user_router())
        .nest("/api/video", api::video::routes::video_router())
        .layer(
            // Layers run top-down: extensions must be in place before the
            // gate resolves the session.
            ServiceBuilder::new()
                .layer(Extension(pool))
                .layer(Extension(jwt_utils))
                .layer(Extension(video_host))
                .layer(Extension(uploader))
                .layer(Extension(mailer))
                .layer(middleware::from_fn(session_gate)),
        );

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting Atrio server on port {}", config.server_port);
    axum::serve(listener, app).await.unwrap();
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "Atrio CRM Backend",
            "version": "0.1.0"
        }),
        "Welcome to the Atrio API",
    ))
}

async fn login_screen() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::ok(serde_json::json!({ "screen": "login" })))
}

async fn crm_screen() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::ok(serde_json::json!({ "screen": "crm" })))
}

async fn portal_screen() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::ok(serde_json::json!({ "screen": "portal" })))
}
