//! Database repository for project documents.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateDocument, Document};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct DocumentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DocumentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_document(
        &self,
        id: &str,
        document: &CreateDocument,
        uploaded_by: &str,
    ) -> Result<Document> {
        let created = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (id, project_id, name, storage_url, uploaded_by)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&document.project_id)
        .bind(&document.name)
        .bind(&document.storage_url)
        .bind(uploaded_by)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    pub async fn get_document_by_id(&self, id: &str) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(document)
    }

    pub async fn get_documents_by_project_id(
        &self,
        project_id: &str,
        pagination: &PaginationFilter,
    ) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT * FROM documents
            WHERE project_id = ? AND is_deleted = 0
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(project_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(documents)
    }

    pub async fn count_documents_by_project_id(&self, project_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM documents WHERE project_id = ? AND is_deleted = 0",
        )
        .bind(project_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }

    /// Soft delete.
    pub async fn delete_document(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE documents SET is_deleted = 1, deleted_at = ? WHERE id = ? AND is_deleted = 0",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
