//! Budget business logic service.
//!
//! Budgets hang off leads. The total is always computed here from the line
//! items, never taken from the request.

use crate::api::common::PaginationFilter;
use crate::database::models::{Budget, BudgetItem, BudgetStatus, CreateBudget};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::budget_repository::BudgetRepository;
use crate::repositories::lead_repository::LeadRepository;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct BudgetService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BudgetService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_budget(&self, create_budget: CreateBudget) -> ServiceResult<Budget> {
        if let Err(errors) = create_budget.validate() {
            return Err(ServiceError::validation(
                crate::api::common::validation_errors_to_field_errors(errors)
                    .into_iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", "),
            ));
        }

        let leads = LeadRepository::new(self.pool);
        if leads.get_lead_by_id(&create_budget.lead_id).await?.is_none() {
            return Err(ServiceError::not_found("Lead", &create_budget.lead_id));
        }

        let total_cents = Self::total_cents(&create_budget.items)?;
        let items_json = serde_json::to_string(&create_budget.items)
            .map_err(|e| ServiceError::internal_error(format!("Item encoding failed: {}", e)))?;

        let repo = BudgetRepository::new(self.pool);
        let budget = repo
            .create_budget(
                &Uuid::now_v7().to_string(),
                &create_budget.lead_id,
                &create_budget.title,
                &items_json,
                total_cents,
            )
            .await?;
        Ok(budget)
    }

    pub async fn get_budget_required(&self, id: &str) -> ServiceResult<Budget> {
        let repo = BudgetRepository::new(self.pool);
        repo.get_budget_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Budget", id))
    }

    pub async fn get_budgets_by_lead(
        &self,
        lead_id: &str,
        pagination: &PaginationFilter,
    ) -> ServiceResult<(Vec<Budget>, u64)> {
        let repo = BudgetRepository::new(self.pool);
        let budgets = repo.get_budgets_by_lead_id(lead_id, pagination).await?;
        let total = repo.count_budgets_by_lead_id(lead_id).await?;
        Ok((budgets, total))
    }

    pub async fn update_status(&self, id: &str, status: BudgetStatus) -> ServiceResult<Budget> {
        let current = self.get_budget_required(id).await?;

        // Approved and rejected budgets are settled; only drafts and sent
        // budgets may still move.
        if matches!(
            current.status,
            BudgetStatus::Approved | BudgetStatus::Rejected
        ) {
            return Err(ServiceError::invalid_operation(format!(
                "Budget is already {}",
                current.status
            )));
        }

        let repo = BudgetRepository::new(self.pool);
        repo.update_budget_status(id, status)
            .await?
            .ok_or_else(|| ServiceError::not_found("Budget", id))
    }

    pub async fn delete_budget(&self, id: &str) -> ServiceResult<()> {
        let repo = BudgetRepository::new(self.pool);
        if !repo.delete_budget(id).await? {
            return Err(ServiceError::not_found("Budget", id));
        }
        Ok(())
    }

    fn total_cents(items: &[BudgetItem]) -> ServiceResult<i64> {
        items.iter().try_fold(0i64, |total, item| {
            item.unit_price_cents
                .checked_mul(item.quantity as i64)
                .and_then(|line| total.checked_add(line))
                .ok_or_else(|| ServiceError::validation("Budget total exceeds the representable amount"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::CreateLead;
    use crate::repositories::lead_repository::LeadRepository;

    async fn pool_with_lead() -> (SqlitePool, String) {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();

        let lead = LeadRepository::new(&pool)
            .create_lead(
                "lead-1",
                &CreateLead {
                    name: "Prospect".to_string(),
                    email: "p@example.com".to_string(),
                    phone: None,
                    source: None,
                    assigned_to: None,
                },
            )
            .await
            .unwrap();
        (pool, lead.id)
    }

    fn items() -> Vec<BudgetItem> {
        vec![
            BudgetItem {
                description: "Discovery".to_string(),
                quantity: 1,
                unit_price_cents: 150_000,
            },
            BudgetItem {
                description: "Development".to_string(),
                quantity: 3,
                unit_price_cents: 200_000,
            },
        ]
    }

    #[tokio::test]
    async fn computes_total_from_items() {
        let (pool, lead_id) = pool_with_lead().await;
        let service = BudgetService::new(&pool);

        let budget = service
            .create_budget(CreateBudget {
                lead_id,
                title: "Website".to_string(),
                items: items(),
            })
            .await
            .unwrap();

        assert_eq!(budget.total_cents, 750_000);
        assert_eq!(budget.status, BudgetStatus::Draft);

        let parsed: Vec<BudgetItem> = serde_json::from_str(&budget.items).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[tokio::test]
    async fn settled_budgets_cannot_move() {
        let (pool, lead_id) = pool_with_lead().await;
        let service = BudgetService::new(&pool);

        let budget = service
            .create_budget(CreateBudget {
                lead_id,
                title: "Website".to_string(),
                items: items(),
            })
            .await
            .unwrap();

        service
            .update_status(&budget.id, BudgetStatus::Sent)
            .await
            .unwrap();
        service
            .update_status(&budget.id, BudgetStatus::Approved)
            .await
            .unwrap();

        let err = service
            .update_status(&budget.id, BudgetStatus::Rejected)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidOperation { .. }));
    }

    #[tokio::test]
    async fn rejects_budget_for_missing_lead() {
        let (pool, _) = pool_with_lead().await;
        let service = BudgetService::new(&pool);

        let err = service
            .create_budget(CreateBudget {
                lead_id: "no-such-lead".to_string(),
                title: "Website".to_string(),
                items: items(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn rejects_budget_whose_total_overflows() {
        let (pool, lead_id) = pool_with_lead().await;
        let service = BudgetService::new(&pool);

        let err = service
            .create_budget(CreateBudget {
                lead_id,
                title: "Oversized".to_string(),
                items: vec![BudgetItem {
                    description: "Everything".to_string(),
                    quantity: 2,
                    unit_price_cents: i64::MAX / 2 + 1,
                }],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));

        let budgets = service
            .get_budgets_by_lead("lead-1", &PaginationFilter::default())
            .await
            .unwrap();
        assert!(budgets.0.is_empty());
    }
}
