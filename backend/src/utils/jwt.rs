//! JWT token utilities for authentication and authorization.
//!
//! Provides secure token creation, validation, and claims management for
//! user sessions. Tokens carry the principal's role so the request gate can
//! classify a session without touching the database, but the authoritative
//! role lookup still happens per request.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::{Role, SubRole};
use crate::errors::ServiceError;

/// JWT Claims structure containing session data
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Principal (user) ID
    pub sub: String,
    /// Principal role at issue time
    pub role: Role,
    /// Admin sub-role, when the principal has one
    pub sub_role: Option<SubRole>,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

/// JWT token utility for creating and validating tokens
#[derive(Clone)]
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from application config.
    pub fn new(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in_seconds: config.jwt_expires_in_seconds,
        }
    }

    /// Generate a new access token for a principal.
    pub fn generate_token(
        &self,
        user_id: String,
        role: Role,
        sub_role: Option<SubRole>,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_seconds as i64);

        let claims = Claims {
            sub: user_id,
            role,
            sub_role,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::validation(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::validation(format!("Token validation failed: {}", e)))
    }

    /// Generate a refresh token (longer expiration).
    pub fn generate_refresh_token(
        &self,
        user_id: String,
        role: Role,
        sub_role: Option<SubRole>,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::days(30);

        let claims = Claims {
            sub: user_id,
            role,
            sub_role,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            ServiceError::validation(format!("Refresh token generation failed: {}", e))
        })
    }

    /// Access token lifetime in seconds, as configured.
    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds
    }
}

impl Claims {
    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        now > self.exp
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmailConfig, VideoHostConfig};

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

    #[test]
    fn round_trips_claims() {
        let jwt = JwtUtils::new(&test_config());
        let token = jwt
            .generate_token("user-1".to_string(), Role::Admin, Some(SubRole::Ventas))
            .unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.sub_role, Some(SubRole::Ventas));
        assert!(claims.is_admin());
        assert!(!claims.is_expired());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let jwt = JwtUtils::new(&test_config());
        let mut other = test_config();
        other.jwt_secret = "different-secret".to_string();
        let other_jwt = JwtUtils::new(&other);

        let token = other_jwt
            .generate_token("user-1".to_string(), Role::Cliente, None)
            .unwrap();
        assert!(jwt.validate_token(&token).is_err());
    }
}
