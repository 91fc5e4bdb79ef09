//! Handler functions for video upload and catalog endpoints.
//!
//! Session creation talks to the external video host; persistence and
//! listing go through the local catalog. Host failures carry the
//! upstream HTTP status through to the client when one is known.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::database::models::{CreateVideoRecord, VideoRecord};
use crate::errors::UploadError;
use crate::services::video_host::{NewUploadSession, VideoHost};
use crate::services::video_service::VideoService;
use crate::services::video_upload::{UploadProgress, UploadRequest, VideoUploader};
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Deserialize)]
pub struct CreateUploadSessionRequest {
    pub title: String,
    pub description: Option<String>,
    pub size_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct UploadSessionResponse {
    pub upload_url: String,
    pub resource_uri: String,
    pub resource_id: String,
}

fn upload_error_to_http(error: UploadError) -> (StatusCode, String) {
    error!("Video host request failed: {}", error);
    let status = match &error {
        UploadError::Busy => StatusCode::CONFLICT,
        _ => error
            .upstream_status()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    };
    (status, error.to_string())
}

#[axum::debug_handler]
pub async fn create_upload_session(
    Extension(host): Extension<Arc<dyn VideoHost>>,
    Json(payload): Json<CreateUploadSessionRequest>,
) -> Result<ResponseJson<ApiResponse<UploadSessionResponse>>, (StatusCode, String)> {
    let request = NewUploadSession {
        title: payload.title,
        description: payload.description,
        size_bytes: payload.size_bytes,
    };
    match host.create_upload_session(&request).await {
        Ok(session) => {
            let response = UploadSessionResponse {
                resource_id: session.resource_id().to_string(),
                upload_url: session.upload_url,
                resource_uri: session.resource_uri,
            };
            Ok(ResponseJson(ApiResponse::success(
                response,
                "Upload session created",
            )))
        }
        Err(error) => Err(upload_error_to_http(error)),
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadVideoRequest {
    pub file_path: String,
    pub title: String,
    pub description: Option<String>,
    pub project_id: String,
    pub category: String,
    pub duration_seconds: i64,
}

/// Runs the whole upload workflow for a file already on this host's disk:
/// session, transfer, Video Record. The response arrives when the run ends;
/// progress is observable at `/upload/progress` meanwhile.
#[axum::debug_handler]
pub async fn upload_video(
    Extension(uploader): Extension<Arc<VideoUploader>>,
    Json(payload): Json<UploadVideoRequest>,
) -> Result<ResponseJson<ApiResponse<VideoRecord>>, (StatusCode, String)> {
    let request = UploadRequest {
        file_path: payload.file_path.into(),
        title: payload.title,
        description: payload.description,
        project_id: payload.project_id,
        category: payload.category,
        duration_seconds: payload.duration_seconds,
    };
    match uploader.upload(request, None).await {
        Ok(video) => Ok(ResponseJson(ApiResponse::success(video, "Video uploaded"))),
        Err(error) => Err(upload_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn upload_progress(
    Extension(uploader): Extension<Arc<VideoUploader>>,
) -> ResponseJson<ApiResponse<UploadProgress>> {
    ResponseJson(ApiResponse::ok(uploader.progress()))
}

#[axum::debug_handler]
pub async fn cancel_upload(
    Extension(uploader): Extension<Arc<VideoUploader>>,
) -> ResponseJson<ApiResponse<()>> {
    uploader.cancel_current();
    ResponseJson(ApiResponse::success((), "Upload cancelled"))
}

#[axum::debug_handler]
pub async fn record_video(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateVideoRecord>,
) -> Result<ResponseJson<ApiResponse<VideoRecord>>, (StatusCode, String)> {
    let service = VideoService::new(&pool);
    match service.record_video(payload).await {
        Ok(video) => Ok(ResponseJson(ApiResponse::success(video, "Video recorded"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_videos_by_project(
    Extension(pool): Extension<SqlitePool>,
    Path(project_id): Path<String>,
    Query(filter): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<VideoRecord>>>, (StatusCode, String)> {
    let service = VideoService::new(&pool);
    match service.get_videos_by_project(&project_id, &filter).await {
        Ok((videos, total)) => {
            let pagination = PaginationMeta::from_filter(&filter, total);
            Ok(ResponseJson(ApiResponse::ok_paginated(videos, pagination)))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Deletes the asset on the video host. The local Video Record stays;
/// removing it is a separate, deliberate operation.
#[axum::debug_handler]
pub async fn delete_video(
    Extension(pool): Extension<SqlitePool>,
    Extension(host): Extension<Arc<dyn VideoHost>>,
    Path(resource_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = VideoService::new(&pool);
    match service.delete_remote_video(host.as_ref(), &resource_id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success((), "Video deleted"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Drops the local catalog entry for a video whose remote asset was already
/// removed (or never should have been recorded).
#[axum::debug_handler]
pub async fn delete_video_record(
    Extension(pool): Extension<SqlitePool>,
    Path(resource_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = VideoService::new(&pool);
    match service.delete_video_record(&resource_id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success((), "Video record deleted"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
