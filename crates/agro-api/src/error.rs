//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps [`DomainError`] to HTTP status codes and a JSON body with error
//! code, message, and details. Upstream failures are logged and replaced
//! with a generic message.

use agro_domain::DomainError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Resource absent or outside the caller's scope (404).
    #[error("{0}")]
    NotFound(String),

    /// A field rule or invariant failed (422). `rule` is the stable rule code.
    #[error("{message}")]
    Validation { rule: &'static str, message: String },

    /// Body or path could not be parsed (400).
    #[error("{0}")]
    BadRequest(String),

    /// Unique tax ID already registered (409).
    #[error("{0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let details = match &self {
            Self::Validation { rule, .. } => Some(serde_json::json!({ "rule": rule })),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::Validation(v) => Self::Validation {
                rule: v.code(),
                message: v.to_string(),
            },
            DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
            DomainError::Conflict(_) => Self::Conflict(err.to_string()),
            DomainError::Upstream(_) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agro_core::{Resource, ValidationError};
    use agro_domain::{RepositoryError, UniqueField};

    #[test]
    fn validation_maps_to_422_with_rule() {
        let err = AppError::from(DomainError::from(ValidationError::InvalidCpf));
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "CPF inválido");
    }

    #[test]
    fn not_found_keeps_literal_message() {
        let err = AppError::from(DomainError::not_found(Resource::Producer, "42"));
        assert_eq!(err.status_and_code().0, StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Produtor com ID 42 não encontrado");
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = AppError::from(DomainError::Conflict(UniqueField::Cnpj));
        assert_eq!(err.status_and_code().0, StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "CNPJ já cadastrado no sistema");
    }

    #[test]
    fn upstream_maps_to_500() {
        let err = AppError::from(DomainError::Upstream(RepositoryError::Backend(
            "pool timed out".into(),
        )));
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn bad_request_status_code() {
        let err = AppError::BadRequest("malformed JSON".to_string());
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "BAD_REQUEST"));
    }
}
