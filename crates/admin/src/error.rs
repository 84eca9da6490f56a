//! Unified error handling for the admin console.
//!
//! Mirrors the storefront's approach: capture server-side failures to
//! Sentry, answer the client with a safe message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::AdminApiError;

/// Application-level error type for the admin console.
#[derive(Debug, Error)]
pub enum AppError {
    /// Admin API operation failed.
    #[error("API error: {0}")]
    Api(#[from] AdminApiError),

    /// Session read/write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Api(AdminApiError::Http(_) | AdminApiError::Server { .. })
                | Self::Session(_)
                | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Api(AdminApiError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Api(AdminApiError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let message = match &self {
            Self::Api(AdminApiError::NotFound(_)) | Self::NotFound(_) => "Not found".to_string(),
            Self::Api(AdminApiError::InvalidCredentials) => "Invalid credentials".to_string(),
            Self::Api(_) => "The Heartwood API is temporarily unavailable".to_string(),
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::BadRequest(message) => message.clone(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found = AppError::NotFound("x".to_string()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let unauthorized = AppError::Api(AdminApiError::InvalidCredentials).into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
    }
}
