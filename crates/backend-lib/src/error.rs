// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::AuthError;
use crate::storage::StorageError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Every access/refresh token rejection. The cause stays attached for
    /// logging but never reaches the client.
    #[error("Invalid or expired token")]
    InvalidToken(#[source] AuthError),

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Malformed authorization header")]
    MalformedAuthHeader,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(#[source] StorageError),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::InvalidToken(_)
            | AppError::MissingAuthHeader
            | AppError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AppError::MalformedAuthHeader | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "AUTH_001",
            AppError::InvalidToken(_) => "AUTH_002",
            AppError::MissingAuthHeader => "AUTH_003",
            AppError::MalformedAuthHeader => "AUTH_004",
            AppError::InvalidApiKey => "AUTH_005",
            AppError::InvalidInput(_) => "VAL_001",
            AppError::Forbidden(_) => "PERM_001",
            AppError::NotFound(_) => "NF_001",
            AppError::Conflict(_) => "CONFLICT_001",
            AppError::Internal(_) => "INT_001",
            AppError::Storage(_) => "STORE_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::InvalidToken(_) => "Invalid or expired token".to_string(),
            AppError::MissingAuthHeader => "Missing authorization header".to_string(),
            AppError::MalformedAuthHeader => "Malformed authorization header".to_string(),
            AppError::InvalidApiKey => "Invalid API key".to_string(),
            AppError::InvalidInput(_) => "Invalid input provided".to_string(),
            AppError::Forbidden(_) => "Permission denied".to_string(),
            AppError::NotFound(_) => "Resource not found".to_string(),
            AppError::Conflict(_) => "Resource already exists".to_string(),
            AppError::Internal(_) | AppError::Storage(_) => {
                "An internal server error occurred".to_string()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if status.is_server_error() {
            tracing::error!(code = error_code, error = ?self, "request failed");
        } else if let AppError::InvalidToken(cause) = &self {
            tracing::info!(code = error_code, reason = cause.kind(), "token rejected");
        } else {
            tracing::debug!(code = error_code, error = %self, "request rejected");
        }

        // Server errors are always sanitized; client errors carry detail in
        // debug builds.
        let message = if cfg!(debug_assertions) && !status.is_server_error() {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::CredentialInvalid => AppError::InvalidCredentials,
            e if e.is_token_rejection() => AppError::InvalidToken(e),
            AuthError::PasswordTooLong { max } => {
                AppError::InvalidInput(format!("password exceeds {max} bytes"))
            },
            AuthError::Persistence(e) => AppError::Storage(e),
            e => AppError::Internal(e.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateEmail => AppError::Conflict("email already registered".into()),
            StorageError::NotFound => AppError::NotFound("record not found".into()),
            e => AppError::Storage(e),
        }
    }
}
