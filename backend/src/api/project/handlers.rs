//! Handler functions for project endpoints.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::database::models::{CreateProject, Project};
use crate::services::project_service::ProjectService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

#[axum::debug_handler]
pub async fn create_project(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, (StatusCode, String)> {
    let service = ProjectService::new(&pool);
    match service.create_project(payload).await {
        Ok(project) => Ok(ResponseJson(ApiResponse::success(
            project,
            "Project created",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_project(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Project>>, (StatusCode, String)> {
    let service = ProjectService::new(&pool);
    match service.get_project_required(&id).await {
        Ok(project) => Ok(ResponseJson(ApiResponse::ok(project))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_projects_by_client(
    Extension(pool): Extension<SqlitePool>,
    Path(client_id): Path<String>,
    Query(filter): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, (StatusCode, String)> {
    let service = ProjectService::new(&pool);
    match service.get_projects_by_client(&client_id, &filter).await {
        Ok((projects, total)) => {
            let pagination = PaginationMeta::from_filter(&filter, total);
            Ok(ResponseJson(ApiResponse::ok_paginated(projects, pagination)))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}
