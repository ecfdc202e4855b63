//! Error types for the query service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for deepquery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing credentials, invalid chunking parameters)
    #[error("Configuration error: {0}")]
    Config(String),

    /// External provider returned a non-2xx status or a malformed body
    #[error("Provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    /// Embedding provider returned no vector
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Embedding count does not match input count
    #[error("Embedding count mismatch: expected {expected}, got {actual}")]
    EmbeddingMismatch { expected: usize, actual: usize },

    /// Request body failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid bearer credential
    #[error("Unauthorized: {0}")]
    Auth(String),

    /// External call exceeded its deadline
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The client disconnected and the event channel closed.
    /// Internal cancellation marker, never serialized to the wire.
    #[error("event stream closed by consumer")]
    StreamClosed,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a provider error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True when the error is the cancellation marker
    pub fn is_stream_closed(&self) -> bool {
        matches!(self, Self::StreamClosed)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else {
            Error::Http(err)
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::Provider { provider, message } => (
                StatusCode::BAD_GATEWAY,
                "provider_error",
                format!("{}: {}", provider, message),
            ),
            Error::Embedding(msg) => {
                (StatusCode::BAD_GATEWAY, "embedding_error", msg.clone())
            }
            Error::EmbeddingMismatch { .. } => (
                StatusCode::BAD_GATEWAY,
                "embedding_error",
                self.to_string(),
            ),
            Error::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone())
            }
            Error::Auth(msg) => (StatusCode::UNAUTHORIZED, "auth_error", msg.clone()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            Error::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout", self.to_string()),
            Error::StreamClosed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "stream closed".to_string(),
            ),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
