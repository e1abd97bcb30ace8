//! Service error types with HTTP status code mapping.
//!
//! [`ForgeError`] is the central error type. Each variant maps to an HTTP
//! status code and a `{"error": "..."}` JSON body.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error response body.
///
/// ```json
/// { "error": "Bot not found" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Variant          | HTTP Status                 |
/// |------------------|-----------------------------|
/// | `InvalidRequest` | 400 Bad Request             |
/// | `InvalidAction`  | 400 Bad Request             |
/// | `BotNotFound`    | 404 Not Found               |
/// | `Persistence`    | 500 Internal Server Error   |
/// | `Internal`       | 500 Internal Server Error   |
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// Missing or malformed request field.
    #[error("{0}")]
    InvalidRequest(String),

    /// Control action outside `start`, `stop`, `restart`.
    #[error("Invalid action \"{0}\". Use: start, stop, or restart")]
    InvalidAction(String),

    /// No bot with the given identifier exists.
    #[error("Bot not found: {0}")]
    BotNotFound(String),

    /// Data store failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Any other server-side failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ForgeError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidAction(_) => StatusCode::BAD_REQUEST,
            Self::BotNotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the caller. Server-side failures are not echoed.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Persistence(_) | Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for ForgeError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<JsonRejection> for ForgeError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ForgeError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ForgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        let body = ErrorResponse {
            error: self.public_message(),
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_kind() {
        assert_eq!(
            ForgeError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ForgeError::InvalidAction("pause".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ForgeError::BotNotFound("abc".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ForgeError::Persistence("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_failures_are_not_leaked() {
        let err = ForgeError::Persistence("password authentication failed".into());
        assert_eq!(err.public_message(), "Internal server error");

        let err = ForgeError::InvalidAction("pause".into());
        assert!(err.public_message().contains("pause"));
    }

    #[test]
    fn response_carries_status() {
        let response = ForgeError::BotNotFound("abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
