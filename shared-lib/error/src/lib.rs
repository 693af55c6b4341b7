//! Common error types for the token service.
//!
//! This crate provides the error taxonomy shared by the credential store,
//! the token service and the HTTP gateway. Underlying library errors are
//! converted into these kinds before they leave a crate, so transport code
//! never sees raw sqlx or JWT errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error is a store failure rather than a client problem.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(
            self,
            AppError::Database(DatabaseError::Unavailable(_) | DatabaseError::QueryFailed(_))
        )
    }
}

/// Authentication and authorization errors.
///
/// `TokenInvalid` covers bad signatures, malformed tokens and expiry alike;
/// callers cannot tell which one happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing or malformed bearer credentials")]
    MissingCredentials,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token subject no longer exists")]
    SubjectAbsent,

    #[error("Authorization denied")]
    AuthorizationDenied,
}

impl AuthError {
    /// Whether this is an authentication failure (as opposed to authorization).
    pub fn is_authentication(&self) -> bool {
        !matches!(self, AuthError::AuthorizationDenied)
    }
}

/// Credential store errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed identifier: {0}")]
    InvalidId(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// Configuration errors, fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidVar { name: String, value: String },
}

/// Error response for API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        // Every authentication failure shares one code and message.
        if err.is_authentication() {
            Self::new("AUTH_UNAUTHORIZED", "Unauthorized")
        } else {
            Self::new("AUTH_FORBIDDEN", "You do not have permission to access this resource")
        }
    }
}

impl From<&DatabaseError> for ErrorResponse {
    fn from(_: &DatabaseError) -> Self {
        Self::new("STORE_UNAVAILABLE", "Service temporarily unavailable")
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Auth(e) => e.into(),
            // A malformed identifier only comes out of a forged token.
            AppError::Database(DatabaseError::InvalidId(_)) => (&AuthError::TokenInvalid).into(),
            AppError::Database(e) => e.into(),
            AppError::Validation(msg) => Self::new("VALIDATION_FAILED", msg.clone()),
            AppError::Config(_) | AppError::Internal(_) => {
                Self::new("INTERNAL_ERROR", "Internal server error")
            }
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
