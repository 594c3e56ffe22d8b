//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps eligibility rejections and request failures to HTTP status codes
//! with JSON error bodies. Internal error details are never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fincore_core::{NicError, Rejection, RejectionKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// `details` carries machine-readable context for client errors (for a
/// gender mismatch, both the derived and the declared value) and is omitted
/// otherwise.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "GENDER_MISMATCH").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for some client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request field failed a constraint (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body or path could not be parsed (422).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict with an existing record (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The eligibility gate rejected the applicant (422 or 403).
    #[error(transparent)]
    Eligibility(#[from] Rejection),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Eligibility(rejection) => {
                let kind = rejection.kind();
                let status = StatusCode::from_u16(kind.http_status())
                    .unwrap_or(StatusCode::UNPROCESSABLE_ENTITY);
                let code = match kind {
                    RejectionKind::InvalidIdentityFormat => "INVALID_NIC",
                    RejectionKind::SexMismatch => "GENDER_MISMATCH",
                    RejectionKind::PolicyIneligible => "NOT_ELIGIBLE",
                };
                (status, code)
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Eligibility(Rejection::SexMismatch { derived, declared }) => {
                Some(serde_json::json!({
                    "derived": derived,
                    "declared": declared,
                }))
            }
            Self::Eligibility(Rejection::PolicyIneligible { eligible, .. }) => {
                Some(serde_json::json!({ "eligible": eligible }))
            }
            _ => None,
        }
    }

    /// Construct a not-found error (404).
    pub fn not_found(msg: String) -> Self {
        Self::NotFound(msg)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Eligibility(rejection) => {
                tracing::info!(kind = rejection.kind().as_str(), "onboarding rejected")
            }
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// A NIC that fails to parse is an eligibility format rejection.
impl From<NicError> for AppError {
    fn from(err: NicError) -> Self {
        Self::Eligibility(Rejection::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincore_core::{DeclaredGender, Sex};

    #[test]
    fn not_found_status_code() {
        let err = AppError::NotFound("missing customer".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn validation_status_code() {
        let err = AppError::Validation("bad field".to_string());
        assert_eq!(
            err.status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
        );
    }

    #[test]
    fn bad_request_is_unprocessable() {
        let err = AppError::BadRequest("missing field".to_string());
        assert_eq!(err.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn conflict_status_code() {
        let err = AppError::Conflict("duplicate".to_string());
        assert_eq!(err.status_and_code(), (StatusCode::CONFLICT, "CONFLICT"));
    }

    #[test]
    fn invalid_nic_is_422() {
        let err: AppError = fincore_core::Nic::parse("nope").unwrap_err().into();
        assert_eq!(
            err.status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_NIC")
        );
        assert_eq!(err.to_string(), "Invalid Sri Lankan NIC format");
        assert!(err.details().is_none());
    }

    #[test]
    fn gender_mismatch_is_422_with_details() {
        let err = AppError::from(Rejection::SexMismatch {
            derived: Sex::Male,
            declared: DeclaredGender::Female,
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, "GENDER_MISMATCH")
        );
        let details = err.details().unwrap();
        assert_eq!(details["derived"], "Male");
        assert_eq!(details["declared"], "Female");
    }

    #[test]
    fn policy_ineligible_is_403() {
        let err = AppError::from(Rejection::PolicyIneligible {
            derived: Sex::Male,
            eligible: Sex::Female,
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::FORBIDDEN, "NOT_ELIGIBLE")
        );
    }

    #[test]
    fn internal_message_is_hidden() {
        let resp = AppError::Internal("lock poisoned at 0xdead".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_body_omits_empty_details() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "NOT_FOUND".to_string(),
                message: "gone".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
    }
}
