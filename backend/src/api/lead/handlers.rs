//! Handler functions for lead API endpoints.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::database::models::{CreateLead, Lead, LeadStatus};
use crate::services::lead_service::LeadService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::Deserialize;
use sqlx::SqlitePool;

#[derive(Debug, Deserialize)]
pub struct LeadStatusFilter {
    pub status: Option<LeadStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLeadStatusRequest {
    pub status: LeadStatus,
}

#[axum::debug_handler]
pub async fn create_lead(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateLead>,
) -> Result<ResponseJson<ApiResponse<Lead>>, (StatusCode, String)> {
    let service = LeadService::new(&pool);
    match service.create_lead(payload).await {
        Ok(lead) => Ok(ResponseJson(ApiResponse::success(lead, "Lead created"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_lead(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Lead>>, (StatusCode, String)> {
    let service = LeadService::new(&pool);
    match service.get_lead_required(&id).await {
        Ok(lead) => Ok(ResponseJson(ApiResponse::ok(lead))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_leads(
    Extension(pool): Extension<SqlitePool>,
    Query(status): Query<LeadStatusFilter>,
    Query(filter): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Lead>>>, (StatusCode, String)> {
    let service = LeadService::new(&pool);
    match service.get_leads(status.status, &filter).await {
        Ok((leads, total)) => {
            let pagination = PaginationMeta::from_filter(&filter, total);
            Ok(ResponseJson(ApiResponse::ok_paginated(leads, pagination)))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn update_lead_status(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLeadStatusRequest>,
) -> Result<ResponseJson<ApiResponse<Lead>>, (StatusCode, String)> {
    let service = LeadService::new(&pool);
    match service.update_status(&id, payload.status).await {
        Ok(lead) => Ok(ResponseJson(ApiResponse::success(lead, "Status updated"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn delete_lead(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = LeadService::new(&pool);
    match service.delete_lead(&id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success((), "Lead deleted"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
