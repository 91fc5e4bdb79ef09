//! Project business logic service.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateProject, Project, Role};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::project_repository::ProjectRepository;
use crate::repositories::user_repository::UserRepository;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct ProjectService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProjectService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_project(&self, create_project: CreateProject) -> ServiceResult<Project> {
        if let Err(errors) = create_project.validate() {
            return Err(ServiceError::validation(
                crate::api::common::validation_errors_to_field_errors(errors)
                    .into_iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", "),
            ));
        }

        // Projects belong to client users.
        let users = UserRepository::new(self.pool);
        let owner = users
            .get_user_by_id(&create_project.client_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &create_project.client_id))?;
        if owner.role != Role::Cliente {
            return Err(ServiceError::validation(
                "Projects must be owned by a client user".to_string(),
            ));
        }

        let repo = ProjectRepository::new(self.pool);
        let project = repo
            .create_project(&Uuid::now_v7().to_string(), &create_project)
            .await?;
        Ok(project)
    }

    pub async fn get_project_required(&self, id: &str) -> ServiceResult<Project> {
        let repo = ProjectRepository::new(self.pool);
        repo.get_project_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", id))
    }

    pub async fn get_projects_by_client(
        &self,
        client_id: &str,
        pagination: &PaginationFilter,
    ) -> ServiceResult<(Vec<Project>, u64)> {
        let repo = ProjectRepository::new(self.pool);
        let projects = repo.get_projects_by_client_id(client_id, pagination).await?;
        let total = repo.count_projects_by_client_id(client_id).await?;
        Ok((projects, total))
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

        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, role) VALUES \
             ('client-1', 'client@example.com', 'Client', 'x', 'cliente'), \
             ('admin-1', 'admin@example.com', 'Admin', 'x', 'admin')",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn only_clients_own_projects() {
        let pool = test_pool().await;
        let service = ProjectService::new(&pool);

        let project = service
            .create_project(CreateProject {
                client_id: "client-1".to_string(),
                name: "Site".to_string(),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(project.client_id, "client-1");

        let err = service
            .create_project(CreateProject {
                client_id: "admin-1".to_string(),
                name: "Other".to_string(),
                description: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }
}
