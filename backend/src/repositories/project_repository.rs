//! Database repository for client projects.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateProject, Project};
use anyhow::Result;
use sqlx::SqlitePool;

pub struct ProjectRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProjectRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_project(&self, id: &str, project: &CreateProject) -> Result<Project> {
        let created = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (id, client_id, name, description)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&project.client_id)
        .bind(&project.name)
        .bind(&project.description)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    pub async fn get_project_by_id(&self, id: &str) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(project)
    }

    /// Lists a client's projects, newest first.
    pub async fn get_projects_by_client_id(
        &self,
        client_id: &str,
        pagination: &PaginationFilter,
    ) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT * FROM projects
            WHERE client_id = ? AND is_deleted = 0
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(client_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(projects)
    }

    pub async fn count_projects_by_client_id(&self, client_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM projects WHERE client_id = ? AND is_deleted = 0",
        )
        .bind(client_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }
}
