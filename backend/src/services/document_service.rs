//! Document business logic service.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateDocument, Document};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::document_repository::DocumentRepository;
use crate::repositories::project_repository::ProjectRepository;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct DocumentService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DocumentService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Registers document metadata against a project. The bytes themselves
    /// live in external storage; only the URL is recorded.
    pub async fn register_document(
        &self,
        create_document: CreateDocument,
        uploaded_by: &str,
    ) -> ServiceResult<Document> {
        if let Err(errors) = create_document.validate() {
            return Err(ServiceError::validation(
                crate::api::common::validation_errors_to_field_errors(errors)
                    .into_iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", "),
            ));
        }

        let projects = ProjectRepository::new(self.pool);
        if projects
            .get_project_by_id(&create_document.project_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found(
                "Project",
                &create_document.project_id,
            ));
        }

        let repo = DocumentRepository::new(self.pool);
        let document = repo
            .create_document(&Uuid::now_v7().to_string(), &create_document, uploaded_by)
            .await?;
        Ok(document)
    }

    pub async fn get_document_required(&self, id: &str) -> ServiceResult<Document> {
        let repo = DocumentRepository::new(self.pool);
        repo.get_document_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Document", id))
    }

    pub async fn get_documents_by_project(
        &self,
        project_id: &str,
        pagination: &PaginationFilter,
    ) -> ServiceResult<(Vec<Document>, u64)> {
        let repo = DocumentRepository::new(self.pool);
        let documents = repo
            .get_documents_by_project_id(project_id, pagination)
            .await?;
        let total = repo.count_documents_by_project_id(project_id).await?;
        Ok((documents, total))
    }

    pub async fn delete_document(&self, id: &str) -> ServiceResult<()> {
        let repo = DocumentRepository::new(self.pool);
        if !repo.delete_document(id).await? {
            return Err(ServiceError::not_found("Document", id));
        }
        Ok(())
    }
}
