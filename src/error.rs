//! Error types for Gemini Relay
//!
//! Every error renders as a JSON body with an `error` field. Provider
//! rejections are the exception: their status and body are relayed verbatim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::translate::TranslationError;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API key is missing on server")]
    MissingCredentials,

    /// Non-quota error returned by the provider
    #[error("Provider returned {status}")]
    Provider { status: StatusCode, body: Value },

    #[error("All API keys exhausted")]
    CredentialsExhausted { details: Option<String> },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TranslationError> for AppError {
    fn from(err: TranslationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorResponse::new("Method not allowed"),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            AppError::MissingCredentials => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("API key is missing on server"),
            ),
            AppError::Provider { status, body } => return (status, Json(body)).into_response(),
            AppError::CredentialsExhausted { details } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse {
                    error: "All API keys exhausted".to_string(),
                    details,
                },
            ),
            AppError::Internal(err) => {
                error!(error = %err, "Unhandled proxy error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal Server Error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
