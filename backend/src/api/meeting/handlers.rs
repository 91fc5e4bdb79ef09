//! Handler functions for meeting scheduling endpoints.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::database::models::{CreateMeeting, Meeting};
use crate::services::email_service::EmailService;
use crate::services::meeting_service::MeetingService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use std::sync::Arc;

#[axum::debug_handler]
pub async fn schedule_meeting(
    Extension(pool): Extension<SqlitePool>,
    Extension(mailer): Extension<Arc<EmailService>>,
    Json(payload): Json<CreateMeeting>,
) -> Result<ResponseJson<ApiResponse<Meeting>>, (StatusCode, String)> {
    let service = MeetingService::new(&pool);
    match service.schedule_meeting(payload, Some(&mailer)).await {
        Ok(meeting) => Ok(ResponseJson(ApiResponse::success(
            meeting,
            "Meeting scheduled",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_meeting(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Meeting>>, (StatusCode, String)> {
    let service = MeetingService::new(&pool);
    match service.get_meeting_required(&id).await {
        Ok(meeting) => Ok(ResponseJson(ApiResponse::ok(meeting))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_meetings_by_project(
    Extension(pool): Extension<SqlitePool>,
    Path(project_id): Path<String>,
    Query(filter): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Meeting>>>, (StatusCode, String)> {
    let service = MeetingService::new(&pool);
    match service.get_meetings_by_project(&project_id, &filter).await {
        Ok((meetings, total)) => {
            let pagination = PaginationMeta::from_filter(&filter, total);
            Ok(ResponseJson(ApiResponse::ok_paginated(meetings, pagination)))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn cancel_meeting(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Meeting>>, (StatusCode, String)> {
    let service = MeetingService::new(&pool);
    match service.cancel_meeting(&id).await {
        Ok(meeting) => Ok(ResponseJson(ApiResponse::success(
            meeting,
            "Meeting cancelled",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
