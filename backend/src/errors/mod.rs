//! Global application error types and handlers.
//!
//! This module defines custom error types that are used across the entire
//! backend application and provides mechanisms for consistent error handling
//! and response formatting.

use thiserror::Error;

/// Generic service error that can be used across all entities
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("{entity} already exists: {identifier}")]
    AlreadyExists { entity: String, identifier: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    #[error("External service error: {message}")]
    ExternalService { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn already_exists(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    pub fn external_service(message: impl Into<String>) -> Self {
        Self::ExternalService {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Errors raised by the video upload workflow.
///
/// Each variant maps to one step of the upload so a failed run can tell the
/// user exactly where it stopped. The upstream HTTP status is carried where
/// the video host returned one.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload session creation failed: {message}")]
    SessionCreation {
        message: String,
        status: Option<u16>,
    },

    #[error("Transfer failed: {message}")]
    Transfer { message: String },

    #[error("Failed to record video: {message}")]
    Persistence { message: String },

    #[error("Upload cancelled")]
    Cancelled,

    #[error("An upload is already in progress")]
    Busy,

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn session_creation(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::SessionCreation {
            message: message.into(),
            status,
        }
    }

    pub fn transfer(message: impl Into<String>) -> Self {
        Self::Transfer {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Upstream HTTP status, when the video host supplied one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::SessionCreation { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<UploadError> for ServiceError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Busy => ServiceError::invalid_operation(err.to_string()),
            UploadError::Persistence { message } => ServiceError::internal_error(message),
            other => ServiceError::external_service(other.to_string()),
        }
    }
}
