//! Admin console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_BASE_URL` - Public URL for the admin console
//! - `ADMIN_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `HEARTWOOD_API_URL` - Base URL of the Heartwood REST API
//! - `HEARTWOOD_ADMIN_API_TOKEN` - Bearer token for the admin API surface
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin console
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Base URL of the Heartwood REST API
    pub api_base_url: String,
    /// Bearer token for the admin API surface
    pub api_token: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("session_secret", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &"[REDACTED]")
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;

        let session_secret = SecretString::from(get_required_env("ADMIN_SESSION_SECRET")?);
        if session_secret.expose_secret().len() < MIN_SESSION_SECRET_LENGTH {
            return Err(ConfigError::InsecureSecret(
                "ADMIN_SESSION_SECRET".to_string(),
                format!("must be at least {MIN_SESSION_SECRET_LENGTH} characters"),
            ));
        }

        Ok(Self {
            host,
            port,
            base_url: get_required_env("ADMIN_BASE_URL")?,
            session_secret,
            api_base_url: get_required_env("HEARTWOOD_API_URL")?,
            api_token: SecretString::from(get_required_env("HEARTWOOD_ADMIN_API_TOKEN")?),
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from("a".repeat(32)),
            api_base_url: "http://localhost:8080".to_string(),
            api_token: SecretString::from("super_secret_admin_token"),
            sentry_dsn: None,
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_admin_token"));
    }

    #[test]
    fn test_socket_addr() {
        let config = AdminConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 9000,
            base_url: String::new(),
            session_secret: SecretString::from("a".repeat(32)),
            api_base_url: String::new(),
            api_token: SecretString::from("t"),
            sentry_dsn: None,
        };
        assert_eq!(config.socket_addr().port(), 9000);
    }
}
