//! Database repository for user management operations.
//!
//! Provides CRUD operations for system users.

use crate::api::common::PaginationFilter;
use crate::database::models::{Role, User};
use anyhow::Result;
use sqlx::SqlitePool;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new user row. The caller supplies the id and the already
    /// hashed password.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_user(
        &self,
        id: &str,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
        sub_role: Option<crate::database::models::SubRole>,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, password_hash, role, sub_role, is_active)
            VALUES (?, ?, ?, ?, ?, ?, 1)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role)
        .bind(sub_role)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    /// Retrieves a user by their unique identifier.
    ///
    /// # Returns
    /// `Some(User)` if found and not deleted, `None` otherwise
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Retrieves a user by their email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = ? AND is_deleted = 0",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Checks if an email already exists in the system.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE email = ? AND is_deleted = 0",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Lists users with a given role, newest first.
    pub async fn get_users_by_role(
        &self,
        role: Role,
        pagination: &PaginationFilter,
    ) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE role = ? AND is_deleted = 0
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(role)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Total count of users with a given role.
    pub async fn count_users_by_role(&self, role: Role) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE role = ? AND is_deleted = 0",
        )
        .bind(role)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u64)
    }
}
