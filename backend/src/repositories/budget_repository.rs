//! Database repository for budgets.
//!
//! Budget lines are stored as a JSON column; the pre-computed total lives
//! alongside so list screens never re-parse the items.

use crate::api::common::PaginationFilter;
use crate::database::models::{Budget, BudgetStatus};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct BudgetRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BudgetRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_budget(
        &self,
        id: &str,
        lead_id: &str,
        title: &str,
        items_json: &str,
        total_cents: i64,
    ) -> Result<Budget> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (id, lead_id, title, items, total_cents, status)
            VALUES (?, ?, ?, ?, ?, 'draft')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(lead_id)
        .bind(title)
        .bind(items_json)
        .bind(total_cents)
        .fetch_one(self.pool)
        .await?;

        Ok(budget)
    }

    pub async fn get_budget_by_id(&self, id: &str) -> Result<Option<Budget>> {
        let budget = sqlx::query_as::<_, Budget>(
            "SELECT * FROM budgets WHERE id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(budget)
    }

    pub async fn get_budgets_by_lead_id(
        &self,
        lead_id: &str,
        pagination: &PaginationFilter,
    ) -> Result<Vec<Budget>> {
        let budgets = sqlx::query_as::<_, Budget>(
            r#"
            SELECT * FROM budgets
            WHERE lead_id = ? AND is_deleted = 0
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(lead_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(budgets)
    }

    pub async fn count_budgets_by_lead_id(&self, lead_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM budgets WHERE lead_id = ? AND is_deleted = 0",
        )
        .bind(lead_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }

    pub async fn update_budget_status(
        &self,
        id: &str,
        status: BudgetStatus,
    ) -> Result<Option<Budget>> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            UPDATE budgets SET status = ?, updated_at = ?
            WHERE id = ? AND is_deleted = 0
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(budget)
    }

    /// Soft delete.
    pub async fn delete_budget(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE budgets SET is_deleted = 1, deleted_at = ? WHERE id = ? AND is_deleted = 0",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
