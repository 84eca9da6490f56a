//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::AdminClient;
use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: AdminClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let api = AdminClient::new(&config);
        Self {
            inner: Arc::new(AppStateInner { config, api }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the admin API client.
    #[must_use]
    pub fn api(&self) -> &AdminClient {
        &self.inner.api
    }
}
