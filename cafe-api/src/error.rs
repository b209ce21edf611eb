//! Error types for cafe-api
//!
//! Every rule violation keeps its own error code so clients can render a
//! distinct message for each.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cafe_common::RuleViolation;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409), e.g. lost an optimistic update after all retries
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Domain rule violation (400, or 409 for already-recorded files)
    #[error(transparent)]
    Rule(RuleViolation),

    /// cafe-common error
    #[error("Common error: {0}")]
    Common(cafe_common::Error),
}

impl From<cafe_common::Error> for ApiError {
    fn from(err: cafe_common::Error) -> Self {
        match err {
            cafe_common::Error::Rule(violation) => ApiError::Rule(violation),
            cafe_common::Error::NotFound(msg) => ApiError::NotFound(msg),
            cafe_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            cafe_common::Error::VersionConflict { .. } => ApiError::Conflict(err.to_string()),
            other => ApiError::Common(other),
        }
    }
}

impl From<RuleViolation> for ApiError {
    fn from(violation: RuleViolation) -> Self {
        ApiError::Rule(violation)
    }
}

/// Status and stable error code for a rule violation
pub fn rule_status(violation: &RuleViolation) -> (StatusCode, &'static str) {
    match violation {
        RuleViolation::IndexOutOfRange { .. } => (StatusCode::BAD_REQUEST, "INDEX_OUT_OF_RANGE"),
        RuleViolation::TooManyImages { .. } => (StatusCode::BAD_REQUEST, "TOO_MANY_IMAGES"),
        RuleViolation::TooManyOrphanFiles { .. } => {
            (StatusCode::BAD_REQUEST, "TOO_MANY_ORPHAN_FILES")
        }
        RuleViolation::DuplicateRequestFile { .. } => {
            (StatusCode::BAD_REQUEST, "DUPLICATE_REQUEST_FILE")
        }
        RuleViolation::IllegalFileType(_) => (StatusCode::BAD_REQUEST, "ILLEGAL_FILE_TYPE"),
        RuleViolation::IllegalDomain(_) => (StatusCode::BAD_REQUEST, "ILLEGAL_DOMAIN"),
        RuleViolation::DuplicateOrphanFile { .. } => (StatusCode::CONFLICT, "DUPLICATE_ORPHAN_FILE"),
        RuleViolation::MismatchedOrphanFields { .. } => {
            (StatusCode::BAD_REQUEST, "MISMATCHED_ORPHAN_FIELDS")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Rule(ref violation) => {
                let (status, code) = rule_status(violation);
                (status, code, violation.to_string())
            }
            ApiError::Common(ref err) => {
                tracing::error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMMON_ERROR",
                    err.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
