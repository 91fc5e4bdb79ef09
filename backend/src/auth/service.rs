//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::auth::policy::{self, CRM_ROOT, PORTAL_ROOT};
use crate::database::models::Role;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::JwtUtils;
use bcrypt::verify;
use sqlx::SqlitePool;
use validator::Validate;

/// Authentication service for handling login and token refresh.
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: JwtUtils,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool, jwt_utils: JwtUtils) -> Self {
        AuthService { pool, jwt_utils }
    }

    /// Authenticate a user by email and password and issue the token pair.
    pub async fn login(&self, login_request: LoginRequest) -> ServiceResult<LoginResponse> {
        if let Err(validation_errors) = login_request.validate() {
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

        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_email(&login_request.email)
            .await?
            .ok_or_else(|| ServiceError::validation("Invalid email or password".to_string()))?;

        let password_ok = verify(&login_request.password, &user.password_hash)
            .map_err(|e| ServiceError::internal_error(format!("Password check failed: {}", e)))?;
        if !password_ok {
            return Err(ServiceError::validation(
                "Invalid email or password".to_string(),
            ));
        }

        if !user.is_active {
            return Err(ServiceError::validation("Account is inactive".to_string()));
        }

        let access_token =
            self.jwt_utils
                .generate_token(user.id.clone(), user.role, user.sub_role)?;
        let refresh_token =
            self.jwt_utils
                .generate_refresh_token(user.id.clone(), user.role, user.sub_role)?;

        let redirect_to = login_request
            .redirect_to
            .filter(|target| Self::is_safe_return_path(target, user.role))
            .unwrap_or_else(|| match user.role {
                Role::Admin => CRM_ROOT.to_string(),
                Role::Cliente => PORTAL_ROOT.to_string(),
            });

        Ok(LoginResponse {
            access_token,
            refresh_token,
            user: UserInfo {
                id: user.id,
                email: user.email,
                name: user.name,
                role: user.role,
                sub_role: user.sub_role,
            },
            expires_in: self.jwt_utils.expires_in_seconds(),
            redirect_to,
        })
    }

    /// Refresh an access token.
    pub async fn refresh_token(
        &self,
        request: RefreshTokenRequest,
    ) -> ServiceResult<RefreshTokenResponse> {
        let claims = self.jwt_utils.validate_token(&request.refresh_token)?;

        // Re-check the principal so a deactivated user cannot keep minting
        // fresh tokens from an old refresh token.
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_id(&claims.sub)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &claims.sub))?;

        if !user.is_active {
            return Err(ServiceError::validation(
                "User account is inactive".to_string(),
            ));
        }

        let access_token = self
            .jwt_utils
            .generate_token(user.id, user.role, user.sub_role)?;

        Ok(RefreshTokenResponse {
            access_token,
            expires_in: self.jwt_utils.expires_in_seconds(),
        })
    }

    /// Only same-site paths the role is actually allowed to land on are
    /// honored as return targets; anything else falls back to the role's
    /// landing page.
    fn is_safe_return_path(target: &str, role: Role) -> bool {
        if !target.starts_with('/') || target.starts_with("//") {
            return false;
        }
        let state = match role {
            Role::Admin => policy::SessionState::Admin { sub_role: None },
            Role::Cliente => policy::SessionState::Cliente,
        };
        matches!(policy::decide(target, &state), policy::GateAction::Proceed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_external_return_paths() {
        assert!(!AuthService::is_safe_return_path(
            "https://evil.example.com",
            Role::Cliente
        ));
        assert!(!AuthService::is_safe_return_path("//evil", Role::Cliente));
        assert!(AuthService::is_safe_return_path("/portal/docs", Role::Cliente));
        // A client never lands on a CRM path, even when requested.
        assert!(!AuthService::is_safe_return_path("/crm/leads", Role::Cliente));
    }
}
