//! Handler functions for document metadata endpoints.

use crate::api::common::{ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http};
use crate::database::models::{CreateDocument, Document};
use crate::services::document_service::DocumentService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

#[axum::debug_handler]
pub async fn register_document(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateDocument>,
) -> Result<ResponseJson<ApiResponse<Document>>, (StatusCode, String)> {
    let service = DocumentService::new(&pool);
    match service.register_document(payload, &claims.sub).await {
        Ok(document) => Ok(ResponseJson(ApiResponse::success(
            document,
            "Document registered",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_document(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Document>>, (StatusCode, String)> {
    let service = DocumentService::new(&pool);
    match service.get_document_required(&id).await {
        Ok(document) => Ok(ResponseJson(ApiResponse::ok(document))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_documents_by_project(
    Extension(pool): Extension<SqlitePool>,
    Path(project_id): Path<String>,
    Query(filter): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Document>>>, (StatusCode, String)> {
    let service = DocumentService::new(&pool);
    match service.get_documents_by_project(&project_id, &filter).await {
        Ok((documents, total)) => {
            let pagination = PaginationMeta::from_filter(&filter, total);
            Ok(ResponseJson(ApiResponse::ok_paginated(
                documents, pagination,
            )))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn delete_document(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = DocumentService::new(&pool);
    match service.delete_document(&id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success((), "Document deleted"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
