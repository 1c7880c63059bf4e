//! Application error type and its HTTP rendering.

use std::fmt;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Unique constraints of the `links` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueConstraint {
    ShortKey,
    OriginalUrl,
}

impl UniqueConstraint {
    /// Maps a PostgreSQL constraint name to a known constraint.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "links_short_key_key" => Some(Self::ShortKey),
            "links_original_url_key" => Some(Self::OriginalUrl),
            _ => None,
        }
    }
}

impl fmt::Display for UniqueConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortKey => f.write_str("short_key"),
            Self::OriginalUrl => f.write_str("original_url"),
        }
    }
}

/// Failures reported by a link store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unique constraint violation on {0}")]
    UniqueViolation(UniqueConstraint),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
            && let Some(constraint) = db.constraint().and_then(UniqueConstraint::from_name)
        {
            return Self::UniqueViolation(constraint);
        }

        Self::Database(e.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Link with short key {key} not found")]
    LinkNotFound { key: String },

    #[error("Link is invalid: {url}")]
    LinkInvalid { url: String },

    #[error("Link is too long: {length} characters")]
    LinkTooLong { length: usize },

    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::LinkNotFound { key: key.into() }
    }

    /// HTTP status this error is rendered with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::LinkNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::LinkInvalid { .. }
            | AppError::LinkTooLong { .. }
            | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into the payload sent to clients.
    ///
    /// Storage details stay in the logs.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::LinkNotFound { key } => (
                "not_found",
                "Short link not found".to_string(),
                json!({ "shortKey": key }),
            ),
            AppError::LinkInvalid { url } => (
                "link_invalid",
                "Link is invalid".to_string(),
                json!({ "url": url }),
            ),
            AppError::LinkTooLong { length } => (
                "link_too_long",
                "Link exceeds 128 characters".to_string(),
                json!({ "length": length }),
            ),
            AppError::Validation { message, details } => {
                ("validation_error", message.clone(), details.clone())
            }
            AppError::Storage(_) => (
                "storage_error",
                "Storage error".to_string(),
                json!({}),
            ),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(StoreError::from(e))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(e.field_errors()).unwrap_or_else(|_| json!({}));
        Self::bad_request("Request validation failed", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        Self::bad_request("Invalid request body", json!({ "reason": e.body_text() }))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Storage(ref e) = self {
            tracing::error!("Storage failure: {}", e);
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status(), Json(body)).into_response()
    }
}
