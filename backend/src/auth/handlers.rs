//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for login, logout, token
//! refresh, and session introspection, and interact with `auth::service`
//! for the core business logic. Login and logout also manage the session
//! cookie pair.

use crate::api::common::service_error_to_http;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::errors::ServiceError;
use crate::repositories::user_repository::UserRepository;
use crate::utils::cookies::{
    ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, removal_cookie, session_cookie,
};
use crate::utils::jwt::{Claims, JwtUtils};
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use axum_extra::extract::cookie::CookieJar;
use sqlx::SqlitePool;

/// Handle user login request. Sets the session cookie pair alongside the
/// JSON body so both the SPA and plain page navigation work.
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt): Extension<JwtUtils>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, ResponseJson<LoginResponse>), (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, jwt);

    match auth_service.login(payload).await {
        Ok(response) => {
            let jar = jar
                .add(session_cookie(
                    ACCESS_TOKEN_COOKIE,
                    response.access_token.clone(),
                ))
                .add(session_cookie(
                    REFRESH_TOKEN_COOKIE,
                    response.refresh_token.clone(),
                ));
            Ok((jar, ResponseJson(response)))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt): Extension<JwtUtils>,
    jar: CookieJar,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<(CookieJar, ResponseJson<RefreshTokenResponse>), (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, jwt);

    match auth_service.refresh_token(payload).await {
        Ok(response) => {
            let jar = jar.add(session_cookie(
                ACCESS_TOKEN_COOKIE,
                response.access_token.clone(),
            ));
            Ok((jar, ResponseJson(response)))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request: drop both session cookies.
#[axum::debug_handler]
pub async fn logout(jar: CookieJar) -> (CookieJar, ResponseJson<serde_json::Value>) {
    let jar = jar
        .add(removal_cookie(ACCESS_TOKEN_COOKIE))
        .add(removal_cookie(REFRESH_TOKEN_COOKIE));

    (
        jar,
        ResponseJson(serde_json::json!({
            "message": "Logged out successfully"
        })),
    )
}

/// Get current user information from the session
#[axum::debug_handler]
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<UserInfo>, (StatusCode, String)> {
    let repo = UserRepository::new(&pool);
    let user = match repo.get_user_by_id(&claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err(service_error_to_http(ServiceError::not_found(
                "User",
                &claims.sub,
            )));
        }
        Err(e) => return Err(service_error_to_http(e.into())),
    };

    Ok(ResponseJson(UserInfo {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        sub_role: user.sub_role,
    }))
}
