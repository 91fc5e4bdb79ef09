//! User business logic service.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateUser, Role, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use bcrypt::{DEFAULT_COST, hash};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user with full validation.
    ///
    /// # Errors
    /// Returns `ServiceError` for validation failures, duplicate emails,
    /// or a sub-role supplied for a non-admin.
    pub async fn create_user(&self, create_user: CreateUser) -> ServiceResult<User> {
        if let Err(validation_errors) = create_user.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();
            return Err(ServiceError::validation(error_messages.join(", ")));
        }

        // Sub-roles only exist inside the admin role.
        if create_user.role == Role::Cliente && create_user.sub_role.is_some() {
            return Err(ServiceError::validation(
                "Clients cannot carry an admin sub-role".to_string(),
            ));
        }

        let repo = UserRepository::new(self.pool);
        if repo.email_exists(&create_user.email).await? {
            return Err(ServiceError::already_exists("User", &create_user.email));
        }

        let password_hash = Self::hash_password(&create_user.password)?;
        let id = Uuid::now_v7().to_string();

        let user = repo
            .create_user(
                &id,
                &create_user.email,
                &create_user.name,
                &password_hash,
                create_user.role,
                create_user.sub_role,
            )
            .await?;

        Ok(user)
    }

    /// Fetches a user, failing if it does not exist.
    pub async fn get_user_required(&self, id: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        repo.get_user_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    pub async fn get_users_by_role(
        &self,
        role: Role,
        pagination: &PaginationFilter,
    ) -> ServiceResult<(Vec<User>, u64)> {
        let repo = UserRepository::new(self.pool);
        let users = repo.get_users_by_role(role, pagination).await?;
        let total = repo.count_users_by_role(role).await?;
        Ok((users, total))
    }

    fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::SubRole;

    async fn test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        pool
    }

    fn admin_request() -> CreateUser {
        CreateUser {
            email: "ventas@example.com".to_string(),
            name: "Sales Lead".to_string(),
            password: "correct horse".to_string(),
            role: Role::Admin,
            sub_role: Some(SubRole::Ventas),
        }
    }

    #[tokio::test]
    async fn creates_and_finds_user() {
        let pool = test_pool().await;
        let service = UserService::new(&pool);

        let user = service.create_user(admin_request()).await.unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.sub_role, Some(SubRole::Ventas));
        assert!(user.is_active);
        // Stored hash, not the password.
        assert_ne!(user.password_hash, "correct horse");

        let found = service.get_user_required(&user.id).await.unwrap();
        assert_eq!(found.email, "ventas@example.com");
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let pool = test_pool().await;
        let service = UserService::new(&pool);

        service.create_user(admin_request()).await.unwrap();
        let err = service.create_user(admin_request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn rejects_sub_role_on_client() {
        let pool = test_pool().await;
        let service = UserService::new(&pool);

        let err = service
            .create_user(CreateUser {
                email: "client@example.com".to_string(),
                name: "Client".to_string(),
                password: "longenough".to_string(),
                role: Role::Cliente,
                sub_role: Some(SubRole::Qa),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }
}
