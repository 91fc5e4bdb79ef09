//! Defines the HTTP routes for video uploads and the video catalog.

use super::handlers::{
    cancel_upload, create_upload_session, delete_video, delete_video_record,
    get_videos_by_project, record_video, upload_progress, upload_video,
};
use crate::auth::middleware::{admin_auth, jwt_auth};
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

pub fn video_router() -> Router {
    Router::new()
        .route(
            "/upload-session",
            post(create_upload_session).layer(middleware::from_fn(admin_auth)),
        )
        .route(
            "/upload",
            post(upload_video).layer(middleware::from_fn(admin_auth)),
        )
        .route("/upload/progress", get(upload_progress))
        .route(
            "/upload/cancel",
            post(cancel_upload).layer(middleware::from_fn(admin_auth)),
        )
        .route("/", post(record_video).layer(middleware::from_fn(admin_auth)))
        .route(
            "/{resource_id}",
            delete(delete_video).layer(middleware::from_fn(admin_auth)),
        )
        .route(
            "/record/{resource_id}",
            delete(delete_video_record).layer(middleware::from_fn(admin_auth)),
        )
        .route("/project/{project_id}", get(get_videos_by_project))
        .layer(middleware::from_fn(jwt_auth))
}
