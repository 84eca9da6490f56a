//! Heartwood REST API clients.
//!
//! # Architecture
//!
//! - The remote API is the source of truth - no local sync, direct calls
//! - Plain REST over JSON via `reqwest`; wire types live in [`types`]
//! - Catalog responses are cached in-memory via `moka` (5 minute TTL)
//! - Server errors carry a structured `{ code, message }` body; callers
//!   branch on the code, never on message text
//!
//! # Example
//!
//! ```rust,ignore
//! use heartwood_storefront::api::CatalogClient;
//!
//! let catalog = CatalogClient::new(&config.api);
//! let product = catalog.get_product("sleeper-couch").await?;
//! ```

pub mod catalog;
pub mod checkout;
pub mod types;

pub use catalog::CatalogClient;
pub use checkout::CheckoutClient;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Well-known error codes in the API error body.
pub mod codes {
    /// The requested credit term is outside the allowed range.
    pub const INVALID_TERM_MONTHS: &str = "invalid_term_months";
}

/// Errors that can occur when talking to the Heartwood API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Server {
        status: u16,
        /// Structured error code from the response body, when present.
        code: Option<String>,
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl ApiError {
    /// The structured error code, if the server reported one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Server { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Structured error body: `{ "error": { "code": ..., "message": ... } }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    message: String,
}

/// Decode a response, mapping non-success statuses to [`ApiError`].
///
/// The body is read as text first so parse failures can be logged with
/// their payload.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(ApiError::RateLimited(retry_after));
    }

    let text = response.text().await?;

    if !status.is_success() {
        let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.error.code, body.error.message),
            Err(_) => (
                None,
                text.chars().take(200).collect::<String>(),
            ),
        };
        tracing::warn!(
            status = %status,
            code = code.as_deref().unwrap_or("-"),
            "Heartwood API returned an error"
        );
        return Err(ApiError::Server {
            status: status.as_u16(),
            code,
            message,
        });
    }

    serde_json::from_str(&text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(500).collect::<String>(),
            "Failed to parse Heartwood API response"
        );
        ApiError::Parse(e)
    })
}

/// Check a bodyless response for success, mapping failures like [`read_json`].
pub(crate) async fn read_ok(response: reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(ApiError::RateLimited(retry_after));
    }

    if status.is_success() {
        return Ok(());
    }

    let text = response.text().await?;
    let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.error.code, body.error.message),
        Err(_) => (None, text.chars().take(200).collect::<String>()),
    };
    Err(ApiError::Server {
        status: status.as_u16(),
        code,
        message,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("sleeper-couch".to_string());
        assert_eq!(err.to_string(), "Not found: sleeper-couch");

        let err = ApiError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }

    #[test]
    fn test_server_error_exposes_code() {
        let err = ApiError::Server {
            status: 422,
            code: Some(codes::INVALID_TERM_MONTHS.to_string()),
            message: "term out of range".to_string(),
        };
        assert_eq!(err.code(), Some(codes::INVALID_TERM_MONTHS));
        assert_eq!(err.to_string(), "API error (422): term out of range");
    }

    #[test]
    fn test_non_server_errors_have_no_code() {
        assert_eq!(ApiError::NotFound("x".to_string()).code(), None);
    }

    #[test]
    fn test_error_body_parses() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"error":{"code":"invalid_term_months","message":"term out of range"}}"#,
        )
        .unwrap();
        assert_eq!(body.error.code.as_deref(), Some("invalid_term_months"));
        assert_eq!(body.error.message, "term out of range");
    }

    #[test]
    fn test_error_body_code_is_optional() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":{"message":"boom"}}"#).unwrap();
        assert!(body.error.code.is_none());
    }
}
