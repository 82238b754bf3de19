//! Application error type and its HTTP mapping.
//!
//! Every fallible operation in the service layer returns [`AppError`]. Each variant
//! carries a human-readable message plus structured JSON `details`, and maps to a
//! fixed HTTP status and machine-readable `code` when rendered by the API layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload: `{"code", "message", "details"}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input. Never retried, always a 400.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Lookup miss for an unknown short code.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Every candidate produced by the generator collided with an existing code.
    #[error("{message}")]
    AllocationExhausted { message: String, details: Value },

    /// The mapping store failed or timed out.
    #[error("{message}")]
    Persistence { message: String, details: Value },

    /// The operating system entropy source could not be read.
    #[error("{message}")]
    RandomSource { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn allocation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::AllocationExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn persistence(message: impl Into<String>, details: Value) -> Self {
        Self::Persistence {
            message: message.into(),
            details,
        }
    }

    pub fn random_source(message: impl Into<String>, details: Value) -> Self {
        Self::RandomSource {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AllocationExhausted { .. }
            | Self::Persistence { .. }
            | Self::RandomSource { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::AllocationExhausted { .. } => "allocation_exhausted",
            Self::Persistence { .. } => "persistence_error",
            Self::RandomSource { .. } => "random_source_error",
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            Self::Validation { message, details }
            | Self::NotFound { message, details }
            | Self::AllocationExhausted { message, details }
            | Self::Persistence { message, details }
            | Self::RandomSource { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", e);

        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::persistence(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        AppError::persistence("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors = e.field_errors();
        let fields: Vec<&str> = errors.keys().map(|k| k.as_ref()).collect();
        AppError::bad_request(
            "Request validation failed",
            json!({ "fields": fields, "reason": e.to_string() }),
        )
    }
}
