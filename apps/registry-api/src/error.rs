//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Registry API                       │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                          │
//! │         │                                                               │
//! │         ├── JSON / query rejection ──► ValidationErrors ("body")  ──┐  │
//! │         ├── ValidationErrors ─────────► CoreError::Validation ──────┤  │
//! │         ├── CoreError (business rule) ──────────────────────────────┤  │
//! │         ├── DbError::UniqueViolation ─► CoreError::*AlreadyExists* ─┤  │
//! │         └── any other DbError ────────► Internal (logged) ──────────┤  │
//! │                                                                     ▼  │
//! │                               IntoResponse: status + ErrorResponse     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Body
//! ```json
//! {
//!   "errorName": "VALIDATION_ERROR",
//!   "message": "Validation error",
//!   "errors": [{ "field": "body.inn", "message": "inn must be at most 12 characters" }]
//! }
//! ```
//! `errors` is `null` for everything except validation failures.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use registry_core::{CoreError, ErrorKind, ValidationError, ValidationErrors};
use registry_db::DbError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message sent with every `VALIDATION_ERROR`; details go in `errors`.
pub const VALIDATION_MESSAGE: &str = "Validation error";

/// API error returned from handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Validation or business rule failure; shown to the caller as is.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Anything else. The detail is logged, never returned.
    #[error("Internal server error")]
    Internal(String),
}

/// Result type for handlers and services.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Core(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_name(&self) -> &'static str {
        match self {
            ApiError::Core(err) => err.error_name(),
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn into_body(self) -> ErrorResponse {
        match self {
            ApiError::Core(CoreError::Validation(errors)) => ErrorResponse {
                error_name: "VALIDATION_ERROR".to_string(),
                message: VALIDATION_MESSAGE.to_string(),
                errors: Some(
                    errors
                        .iter()
                        .map(|e| ErrorDetail {
                            field: e.location.clone(),
                            message: e.message(),
                        })
                        .collect(),
                ),
            },
            other => ErrorResponse {
                error_name: other.error_name().to_string(),
                message: other.to_string(),
                errors: None,
            },
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// UPPER_SNAKE_CASE error name for programmatic handling
    pub error_name: String,

    /// Human-readable message
    pub message: String,

    /// One entry per rejected field; null unless `errorName` is `VALIDATION_ERROR`
    pub errors: Option<Vec<ErrorDetail>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Dotted location, e.g. `body.inn`
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Internal(detail) = &self {
            tracing::error!(%detail, "Request failed with internal error");
        }
        (status, Json(self.into_body())).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Core(CoreError::Validation(errors))
    }
}

/// Converts database errors to API errors.
///
/// A unique violation means another writer won the race past the
/// application-level check, so it surfaces as the same conflict.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err.unique_column() {
            Some("inn") => return CoreError::ClientAlreadyExistsByInn.into(),
            Some("name") => return CoreError::ClientAlreadyExists.into(),
            _ => {}
        }
        match err {
            DbError::NotFound { entity, .. } if entity == "Client" => {
                CoreError::ClientNotFound.into()
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

fn malformed(location: &str, field: &str, reason: String) -> ApiError {
    ValidationErrors::single(
        location,
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason,
        },
    )
    .into()
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        malformed("body", "body", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        malformed("query", "query", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        malformed("path.clientId", "clientId", rejection.body_text())
    }
}
