//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use eventhub_auth::AuthError;
use eventhub_core::error::{AppError, ErrorKind};

/// Body sent for every rejected credential token.
pub const UNAUTHORIZED_BODY: &str = "UNAUTHORIZED!";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// The 401 response for a missing, invalid, expired or revoked token.
pub fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, UNAUTHORIZED_BODY).into_response()
}

/// Render a failed authentication. Store failures keep their own status.
pub fn auth_error_response(err: AuthError) -> Response {
    if err.is_authentication_failure() {
        tracing::debug!(reason = %err, "Rejected credential token");
        unauthorized()
    } else {
        AppError::from(err).into_response()
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.kind {
            ErrorKind::Authentication => {
                return (StatusCode::UNAUTHORIZED, self.message).into_response();
            }
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Cache
            | ErrorKind::Configuration
            | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if self.kind.is_infrastructure() {
            tracing::error!(kind = %self.kind, error = ?self, status = status.as_u16(), "Request failed");
        }

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message: self.message.clone(),
        };

        (status, body).into_response()
    }
}
