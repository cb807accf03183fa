//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::AuthError;
use crate::domain::DomainError;
use crate::ledger::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing required header: {0}")]
    MissingHeader(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    // Server errors (5xx)
    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            // The CHECK constraint is the only source of insufficient funds
            StoreError::BalanceConstraint => AppError::Domain(DomainError::InsufficientFunds),
            other => AppError::Store(other),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// HTTP status and machine-readable code
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::MissingHeader(_) => (StatusCode::UNAUTHORIZED, "missing_header"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),

            AppError::Domain(domain_err) => {
                let code = match domain_err {
                    DomainError::RecipientNotFound(_) => "recipient_not_found",
                    DomainError::ItemNotFound(_) => "item_not_found",
                    DomainError::InsufficientFunds => "insufficient_funds",
                    DomainError::InvalidAmount(_) => "invalid_amount",
                    DomainError::InvalidQuantity(_) => "invalid_quantity",
                    DomainError::SelfTransfer => "self_transfer",
                };
                (StatusCode::BAD_REQUEST, code)
            }

            AppError::Auth(auth_err) if auth_err.is_rejection() => {
                (StatusCode::UNAUTHORIZED, "unauthorized")
            }
            AppError::Auth(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),

            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let details = match &self {
            AppError::InvalidRequest(msg) => Some(msg.clone()),
            AppError::MissingHeader(header) => Some(header.clone()),
            AppError::Domain(DomainError::RecipientNotFound(name))
            | AppError::Domain(DomainError::ItemNotFound(name)) => Some(name.clone()),
            _ => None,
        };

        // Server-side failures are logged in full but not echoed to the client
        let error = if status.is_server_error() {
            tracing::error!(error_code, "Request failed: {:?}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
