//! Shared API types
//!
//! Common types used across all API endpoints, including the error envelope
//! every handler returns on failure.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::access::{AccessError, DenyReason};

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Unauthorized { code: String, message: String },
    Forbidden { code: String, message: String },
    Conflict { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Forbidden {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_sqlite(e: crate::data::SqliteError) -> Self {
        tracing::error!(error = %e, "SQLite error");
        Self::Internal {
            message: "Database operation failed".to_string(),
        }
    }
}

/// Map access engine failures onto the HTTP taxonomy. The 403 messages keep
/// "no access at all" and "read-only, edit denied" distinguishable.
impl From<AccessError> for ApiError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::Unauthenticated(_) => Self::unauthorized(
                "UNAUTHENTICATED",
                "No resolvable principal for this request",
            ),
            AccessError::PermissionDenied {
                profile_id,
                operation,
                reason,
            } => {
                let code = match reason {
                    DenyReason::NoAccess => "NO_ACCESS",
                    DenyReason::ReadOnly => "READ_ONLY",
                    DenyReason::NotApproved => "NOT_APPROVED",
                };
                let message = match (&profile_id, reason) {
                    (Some(id), DenyReason::ReadOnly) => format!(
                        "Read-only access to profile {}: {} denied",
                        id, operation
                    ),
                    (Some(id), _) => format!("No access to profile {}", id),
                    (None, DenyReason::NotApproved) => {
                        "Your account has not been approved yet".to_string()
                    }
                    (None, _) => "Admin role required".to_string(),
                };
                Self::forbidden(code, message)
            }
            AccessError::PrincipalNotFound(id) => {
                Self::not_found("USER_NOT_FOUND", format!("User not found: {}", id))
            }
            AccessError::ProfileNotFound(id) => {
                Self::not_found("PROFILE_NOT_FOUND", format!("Profile not found: {}", id))
            }
            AccessError::InvalidTransition { from, to } => Self::conflict(
                "INVALID_TRANSITION",
                format!("Cannot change role from {} to {}", from, to),
            ),
            AccessError::Storage(e) => Self::from_sqlite(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", code, message)
            }
            Self::Forbidden { code, message } => {
                (StatusCode::FORBIDDEN, "forbidden", code, message)
            }
            Self::Conflict { code, message } => (StatusCode::CONFLICT, "conflict", code, message),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}
