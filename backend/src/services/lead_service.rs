//! Lead business logic service.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateLead, Lead, LeadStatus};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::lead_repository::LeadRepository;
use crate::repositories::user_repository::UserRepository;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct LeadService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LeadService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_lead(&self, create_lead: CreateLead) -> ServiceResult<Lead> {
        if let Err(errors) = create_lead.validate() {
            return Err(ServiceError::validation(
                crate::api::common::validation_errors_to_field_errors(errors)
                    .into_iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", "),
            ));
        }

        // An assignee must be an existing user.
        if let Some(assignee) = &create_lead.assigned_to {
            let users = UserRepository::new(self.pool);
            if users.get_user_by_id(assignee).await?.is_none() {
                return Err(ServiceError::not_found("User", assignee));
            }
        }

        let repo = LeadRepository::new(self.pool);
        let lead = repo
            .create_lead(&Uuid::now_v7().to_string(), &create_lead)
            .await?;
        Ok(lead)
    }

    pub async fn get_lead_required(&self, id: &str) -> ServiceResult<Lead> {
        let repo = LeadRepository::new(self.pool);
        repo.get_lead_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Lead", id))
    }

    pub async fn get_leads(
        &self,
        status: Option<LeadStatus>,
        pagination: &PaginationFilter,
    ) -> ServiceResult<(Vec<Lead>, u64)> {
        let repo = LeadRepository::new(self.pool);
        let leads = repo.get_leads(status, pagination).await?;
        let total = repo.count_leads(status).await?;
        Ok((leads, total))
    }

    pub async fn update_status(&self, id: &str, status: LeadStatus) -> ServiceResult<Lead> {
        let repo = LeadRepository::new(self.pool);
        repo.update_lead_status(id, status)
            .await?
            .ok_or_else(|| ServiceError::not_found("Lead", id))
    }

    pub async fn delete_lead(&self, id: &str) -> ServiceResult<()> {
        let repo = LeadRepository::new(self.pool);
        if !repo.delete_lead(id).await? {
            return Err(ServiceError::not_found("Lead", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        pool
    }

    fn lead_request() -> CreateLead {
        CreateLead {
            name: "Prospect SA".to_string(),
            email: "contact@prospect.example".to_string(),
            phone: None,
            source: Some("web".to_string()),
            assigned_to: None,
        }
    }

    #[tokio::test]
    async fn lead_lifecycle() {
        let pool = test_pool().await;
        let service = LeadService::new(&pool);

        let lead = service.create_lead(lead_request()).await.unwrap();
        assert_eq!(lead.status, LeadStatus::New);

        let updated = service
            .update_status(&lead.id, LeadStatus::Qualified)
            .await
            .unwrap();
        assert_eq!(updated.status, LeadStatus::Qualified);

        let (leads, total) = service
            .get_leads(Some(LeadStatus::Qualified), &PaginationFilter::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(leads[0].id, lead.id);

        service.delete_lead(&lead.id).await.unwrap();
        let err = service.get_lead_required(&lead.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn rejects_unknown_assignee() {
        let pool = test_pool().await;
        let service = LeadService::new(&pool);

        let mut request = lead_request();
        request.assigned_to = Some("no-such-user".to_string());
        let err = service.create_lead(request).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
