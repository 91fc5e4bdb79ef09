//! Handler functions for budget API endpoints.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::database::models::{Budget, BudgetStatus, CreateBudget};
use crate::services::budget_service::BudgetService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::Deserialize;
use sqlx::SqlitePool;

#[derive(Debug, Deserialize)]
pub struct UpdateBudgetStatusRequest {
    pub status: BudgetStatus,
}

#[axum::debug_handler]
pub async fn create_budget(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateBudget>,
) -> Result<ResponseJson<ApiResponse<Budget>>, (StatusCode, String)> {
    let service = BudgetService::new(&pool);
    match service.create_budget(payload).await {
        Ok(budget) => Ok(ResponseJson(ApiResponse::success(budget, "Budget created"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_budget(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Budget>>, (StatusCode, String)> {
    let service = BudgetService::new(&pool);
    match service.get_budget_required(&id).await {
        Ok(budget) => Ok(ResponseJson(ApiResponse::ok(budget))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_budgets_by_lead(
    Extension(pool): Extension<SqlitePool>,
    Path(lead_id): Path<String>,
    Query(filter): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Budget>>>, (StatusCode, String)> {
    let service = BudgetService::new(&pool);
    match service.get_budgets_by_lead(&lead_id, &filter).await {
        Ok((budgets, total)) => {
            let pagination = PaginationMeta::from_filter(&filter, total);
            Ok(ResponseJson(ApiResponse::ok_paginated(budgets, pagination)))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn update_budget_status(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBudgetStatusRequest>,
) -> Result<ResponseJson<ApiResponse<Budget>>, (StatusCode, String)> {
    let service = BudgetService::new(&pool);
    match service.update_status(&id, payload.status).await {
        Ok(budget) => Ok(ResponseJson(ApiResponse::success(budget, "Status updated"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn delete_budget(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = BudgetService::new(&pool);
    match service.delete_budget(&id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success((), "Budget deleted"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
