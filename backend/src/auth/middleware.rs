//! Middleware for protecting authenticated routes and handling authorization.
//!
//! Two layers live here. `session_gate` runs on every request: it resolves
//! the session from cookies, looks the principal's role up, and either lets
//! the request through or redirects per the static route policy. `jwt_auth`
//! and `admin_auth` protect the JSON API routes by rejecting instead of
//! redirecting.

use crate::auth::policy::{self, CRM_ROOT, GateAction, LOGIN_PATH, PORTAL_ROOT, SessionState};
use crate::database::models::Role;
use crate::repositories::user_repository::UserRepository;
use crate::utils::cookies::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, session_cookie};
use crate::utils::jwt::{Claims, JwtUtils};
use axum::{
    extract::{Extension, Request},
    http::{
        StatusCode,
        header::{AUTHORIZATION, HeaderValue, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use sqlx::SqlitePool;
use tracing::warn;

/// Request authorization gate.
///
/// Stateless across requests; the session is reconstructed from cookies on
/// every call. Failures never surface to the user: a broken cookie, an
/// expired token or a failed role lookup all degrade to the stricter
/// redirect branch.
pub async fn session_gate(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt): Extension<JwtUtils>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let jar = CookieJar::from_headers(request.headers());

    let session = resolve_session(&jwt, &jar);

    let state = match &session {
        Some(claims) => match lookup_role(&pool, &claims.sub).await {
            Some((Role::Admin, sub_role)) => SessionState::Admin { sub_role },
            Some((Role::Cliente, _)) => SessionState::Cliente,
            None => SessionState::NoRole,
        },
        None => SessionState::Unauthenticated,
    };

    let mut response = match policy::decide(&path, &state) {
        GateAction::Proceed => {
            if let Some(claims) = &session {
                request.extensions_mut().insert(claims.clone());
            }
            next.run(request).await
        }
        GateAction::RedirectToLogin { return_to } => {
            let query = serde_urlencoded::to_string([("redirectTo", return_to.as_str())])
                .unwrap_or_default();
            Redirect::to(&format!("{}?{}", LOGIN_PATH, query)).into_response()
        }
        GateAction::RedirectToPortal => Redirect::to(PORTAL_ROOT).into_response(),
        GateAction::RedirectToCrm => Redirect::to(CRM_ROOT).into_response(),
    };

    // Sliding refresh: every request with a valid session gets a re-minted
    // access cookie appended to the outgoing response, whatever the gate
    // decided. Minting failures are ignored; the old cookie still stands.
    if let Some(claims) = session {
        if let Ok(token) = jwt.generate_token(claims.sub, claims.role, claims.sub_role) {
            let cookie = session_cookie(ACCESS_TOKEN_COOKIE, token);
            if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
    }

    response
}

/// Resolves the session from the cookie pair: a valid access token wins,
/// otherwise the refresh token is tried. Any validation failure resolves to
/// "no session".
fn resolve_session(jwt: &JwtUtils, jar: &CookieJar) -> Option<Claims> {
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
        if let Ok(claims) = jwt.validate_token(cookie.value()) {
            return Some(claims);
        }
    }

    let refresh = jar.get(REFRESH_TOKEN_COOKIE)?;
    jwt.validate_token(refresh.value()).ok()
}

/// Single role lookup keyed by the principal id. A lookup error is treated
/// as "no role" so the gate fails closed.
async fn lookup_role(pool: &SqlitePool, user_id: &str) -> Option<(Role, Option<crate::database::models::SubRole>)> {
    let repo = UserRepository::new(pool);
    match repo.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.is_active => Some((user.role, user.sub_role)),
        Ok(_) => None,
        Err(e) => {
            warn!("Role lookup failed for {}: {}", user_id, e);
            None
        }
    }
}

/// JWT authentication middleware for the JSON API.
///
/// Accepts a Bearer token or the access cookie, validates it, and stashes
/// the claims in request extensions for handlers.
pub async fn jwt_auth(
    Extension(jwt): Extension<JwtUtils>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = match bearer {
        Some(token) => token,
        None => CookieJar::from_headers(request.headers())
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(StatusCode::UNAUTHORIZED)?,
    };

    match jwt.validate_token(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Admin role authorization middleware. Must run after `jwt_auth`.
pub async fn admin_auth(request: Request, next: Next) -> Result<Response, StatusCode> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !claims.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, EmailConfig, VideoHostConfig};
    use crate::database::models::SubRole;
    use axum::{
        Router,
        body::Body,
        http::{
            Request as HttpRequest,
            header::{COOKIE, LOCATION},
        },
        middleware::from_fn,
        routing::get,
    };
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in_seconds: 3600,
            server_port: 0,
            base_url: "http://localhost:3000".to_string(),
            video_host: VideoHostConfig {
                api_base_url: "https://api.example.com".to_string(),
                api_token: "token".to_string(),
                playback_base_url: "https://player.example.com/video".to_string(),
            },
            email: EmailConfig {
                smtp_host: "localhost".to_string(),
                smtp_port: 587,
                smtp_username: "user".to_string(),
                smtp_password: "pass".to_string(),
                from_email: "noreply@example.com".to_string(),
                from_name: "Test".to_string(),
            },
        }
    }

    async fn pool_with_users() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, role) VALUES \
             ('admin-1', 'admin@example.com', 'Admin', 'x', 'admin'), \
             ('client-1', 'client@example.com', 'Client', 'x', 'cliente')",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    fn gated_app(pool: SqlitePool, jwt: JwtUtils) -> Router {
        Router::new()
            .route("/crm", get(|| async { "crm" }))
            .route("/portal", get(|| async { "portal" }))
            .route("/login", get(|| async { "login" }))
            .layer(
                tower::ServiceBuilder::new()
                    .layer(Extension(pool))
                    .layer(Extension(jwt))
                    .layer(from_fn(session_gate)),
            )
    }

    fn access_cookie(jwt: &JwtUtils, user_id: &str, role: Role, sub_role: Option<SubRole>) -> String {
        let token = jwt
            .generate_token(user_id.to_string(), role, sub_role)
            .unwrap();
        format!("{}={}", ACCESS_TOKEN_COOKIE, token)
    }

    fn carries_fresh_access_cookie(response: &Response) -> bool {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| value.starts_with(&format!("{}=", ACCESS_TOKEN_COOKIE)))
    }

    #[tokio::test]
    async fn admin_session_passes_and_gets_refreshed_cookie() {
        let jwt = JwtUtils::new(&test_config());
        let app = gated_app(pool_with_users().await, jwt.clone());

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/crm")
                    .header(COOKIE, access_cookie(&jwt, "admin-1", Role::Admin, None))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(carries_fresh_access_cookie(&response));
    }

    #[tokio::test]
    async fn client_redirect_off_crm_still_refreshes_cookie() {
        let jwt = JwtUtils::new(&test_config());
        let app = gated_app(pool_with_users().await, jwt.clone());

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/crm")
                    .header(COOKIE, access_cookie(&jwt, "client-1", Role::Cliente, None))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], PORTAL_ROOT);
        assert!(carries_fresh_access_cookie(&response));
    }

    #[tokio::test]
    async fn failed_role_lookup_sends_crm_traffic_to_portal() {
        let jwt = JwtUtils::new(&test_config());
        let pool = pool_with_users().await;
        let cookie = access_cookie(&jwt, "admin-1", Role::Admin, None);
        pool.close().await;
        let app = gated_app(pool, jwt);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/crm")
                    .header(COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], PORTAL_ROOT);
    }

    #[tokio::test]
    async fn login_redirect_percent_encodes_the_return_path() {
        let jwt = JwtUtils::new(&test_config());
        let app = gated_app(pool_with_users().await, jwt);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/crm/leads")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[LOCATION],
            "/login?redirectTo=%2Fcrm%2Fleads"
        );
    }
}
