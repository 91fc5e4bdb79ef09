//! Session cookie helpers.
//!
//! The browser session is carried in two HttpOnly cookies, one per token of
//! the pair. Helpers here build the cookies with consistent attributes so
//! the gate and the auth handlers cannot drift apart.

use axum_extra::extract::cookie::{Cookie, SameSite};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Builds a session cookie. Expiry is enforced by the JWT itself, so the
/// cookie is session-scoped.
pub fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Builds a cookie that instructs the browser to drop the named cookie.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, "")).path("/").http_only(true).build();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only_and_lax() {
        let cookie = session_cookie(ACCESS_TOKEN_COOKIE, "tok".to_string());
        assert_eq!(cookie.name(), "access_token");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn removal_cookie_clears_value() {
        let cookie = removal_cookie(REFRESH_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "");
    }
}
