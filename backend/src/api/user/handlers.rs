//! Handler functions for user management endpoints.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::database::models::{CreateUser, Role, User};
use crate::services::user_service::UserService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::Deserialize;
use sqlx::SqlitePool;

#[derive(Debug, Deserialize)]
pub struct UserRoleFilter {
    pub role: Role,
}

#[axum::debug_handler]
pub async fn create_user(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateUser>,
) -> Result<ResponseJson<ApiResponse<User>>, (StatusCode, String)> {
    let service = UserService::new(&pool);
    match service.create_user(payload).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(user, "User created"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_user(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<User>>, (StatusCode, String)> {
    let service = UserService::new(&pool);
    match service.get_user_required(&id).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::ok(user))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_users(
    Extension(pool): Extension<SqlitePool>,
    Query(role): Query<UserRoleFilter>,
    Query(filter): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<User>>>, (StatusCode, String)> {
    let service = UserService::new(&pool);
    match service.get_users_by_role(role.role, &filter).await {
        Ok((users, total)) => {
            let pagination = PaginationMeta::from_filter(&filter, total);
            Ok(ResponseJson(ApiResponse::ok_paginated(users, pagination)))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}
