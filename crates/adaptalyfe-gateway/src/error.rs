//! Error handling for the gateway.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use adaptalyfe_core::acl::AclError;
use adaptalyfe_objects::VaultError;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Internal server error.
    Internal(String),
    /// Bad request.
    BadRequest(String),
    /// Missing or invalid session.
    Unauthorized(String),
    /// Authenticated but not allowed.
    Forbidden(String),
    /// Not found.
    NotFound(String),
    /// Uniqueness conflict.
    Conflict(String),
    /// Upstream service (sidecar, assistant endpoint) failure.
    Upstream(String),
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error flag.
    pub error: bool,
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
        };

        let body = ErrorResponse {
            error: true,
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<adaptalyfe_core::Error> for AppError {
    fn from(err: adaptalyfe_core::Error) -> Self {
        use adaptalyfe_core::Error;
        match err {
            Error::NotFound => AppError::NotFound("record not found".to_string()),
            Error::Conflict(msg) => AppError::Conflict(msg),
            Error::InvalidData(msg) => AppError::BadRequest(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<VaultError> for AppError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::NotFound(path) => AppError::NotFound(format!("object not found: {}", path)),
            VaultError::InvalidPath(path) => {
                AppError::BadRequest(format!("invalid object path: {}", path))
            }
            VaultError::Signing(msg) => AppError::Upstream(format!("url signing failed: {}", msg)),
            // Unknown group kinds are misconfiguration, surfaced loudly.
            VaultError::Acl(AclError::UnknownGroupType(kind)) => {
                AppError::Internal(format!("unknown object access group type: {}", kind))
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}
