//! Database repository for lead management.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateLead, Lead, LeadStatus};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for lead database operations.
pub struct LeadRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LeadRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_lead(&self, id: &str, lead: &CreateLead) -> Result<Lead> {
        let created = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (id, name, email, phone, source, status, assigned_to)
            VALUES (?, ?, ?, ?, ?, 'new', ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.source)
        .bind(&lead.assigned_to)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    pub async fn get_lead_by_id(&self, id: &str) -> Result<Option<Lead>> {
        let lead = sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads WHERE id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(lead)
    }

    /// Lists leads newest first, optionally narrowed to one status.
    pub async fn get_leads(
        &self,
        status: Option<LeadStatus>,
        pagination: &PaginationFilter,
    ) -> Result<Vec<Lead>> {
        let leads = match status {
            Some(status) => {
                sqlx::query_as::<_, Lead>(
                    r#"
                    SELECT * FROM leads
                    WHERE status = ? AND is_deleted = 0
                    ORDER BY created_at DESC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(status)
                .bind(pagination.limit() as i64)
                .bind(pagination.offset() as i64)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Lead>(
                    r#"
                    SELECT * FROM leads
                    WHERE is_deleted = 0
                    ORDER BY created_at DESC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(pagination.limit() as i64)
                .bind(pagination.offset() as i64)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(leads)
    }

    pub async fn count_leads(&self, status: Option<LeadStatus>) -> Result<u64> {
        let count: i64 = match status {
            Some(status) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM leads WHERE status = ? AND is_deleted = 0",
                )
                .bind(status)
                .fetch_one(self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM leads WHERE is_deleted = 0")
                    .fetch_one(self.pool)
                    .await?
            }
        };

        Ok(count as u64)
    }

    pub async fn update_lead_status(&self, id: &str, status: LeadStatus) -> Result<Option<Lead>> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads SET status = ?, updated_at = ?
            WHERE id = ? AND is_deleted = 0
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(lead)
    }

    /// Soft delete.
    pub async fn delete_lead(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE leads SET is_deleted = 1, deleted_at = ? WHERE id = ? AND is_deleted = 0",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
