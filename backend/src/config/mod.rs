//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, JWT secrets, and the credentials for the
//! external video host and SMTP relay.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: u64,
    pub server_port: u16,
    /// Public base URL of this deployment, used for login redirects and
    /// links embedded in outgoing mail.
    pub base_url: String,
    pub video_host: VideoHostConfig,
    pub email: EmailConfig,
}

/// Connection settings for the external video host API.
#[derive(Debug, Clone)]
pub struct VideoHostConfig {
    pub api_base_url: String,
    pub api_token: String,
    /// Base URL under which uploaded videos are playable, e.g.
    /// `https://player.vimeo.com/video`.
    pub playback_base_url: String,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;

        let jwt_expires_in_seconds = env::var("JWT_EXPIRES_IN_SECONDS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<u64>()
            .context("JWT_EXPIRES_IN_SECONDS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let video_host = VideoHostConfig {
            api_base_url: env::var("VIDEO_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.vimeo.com".to_string()),
            api_token: env::var("VIDEO_API_TOKEN").context("VIDEO_API_TOKEN not set")?,
            playback_base_url: env::var("VIDEO_PLAYBACK_BASE_URL")
                .unwrap_or_else(|_| "https://player.vimeo.com/video".to_string()),
        };

        let email = EmailConfig {
            smtp_host: env::var("SMTP_HOST").context("SMTP_HOST not set")?,
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse::<u16>()
                .context("SMTP_PORT must be a valid number")?,
            smtp_username: env::var("SMTP_USERNAME").context("SMTP_USERNAME not set")?,
            smtp_password: env::var("SMTP_PASSWORD").context("SMTP_PASSWORD not set")?,
            from_email: env::var("SMTP_FROM_EMAIL").context("SMTP_FROM_EMAIL not set")?,
            from_name: env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Atrio CRM".to_string()),
        };

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            jwt_expires_in_seconds,
            server_port,
            base_url,
            video_host,
            email,
        })
    }
}
