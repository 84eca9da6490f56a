//! Admin surface client for the Heartwood REST API.
//!
//! Every back-office screen is a thin view over this client. Calls are
//! authenticated with a service bearer token; the per-admin login is a
//! credential check whose result lives in the session cookie, and the API
//! re-authorizes every call regardless of what this client claims.

pub mod types;

use std::sync::Arc;

use chrono::NaiveDate;
use heartwood_core::{OrderId, OrderStatus, UserId, UserRole};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use crate::config::AdminConfig;

use types::{
    AdminIdentity, AuditPage, InventoryItem, LoginRequest, OrderDetail, OrderPage, RoleUpdate,
    SalesReport, StatusUpdate, StockAdjustment, StockSet, UserPage,
};

/// Errors that can occur when talking to the admin API surface.
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials were rejected.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Server { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Structured error body: `{ "error": { "code": ..., "message": ... } }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for the admin surface of the Heartwood API.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl AdminClient {
    /// Create a new admin API client.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
                token: config.api_token.expose_secret().to_string(),
            }),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AdminApiError> {
        let response = self
            .inner
            .client
            .get(format!("{}{path}", self.inner.base_url))
            .bearer_auth(&self.inner.token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AdminApiError> {
        let response = self
            .inner
            .client
            .post(format!("{}{path}", self.inner.base_url))
            .bearer_auth(&self.inner.token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AdminApiError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map_or_else(|_| text.chars().take(200).collect(), |b| b.error.message);
            tracing::warn!(status = %status, "Admin API returned an error");
            return Err(AdminApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse admin API response"
            );
            AdminApiError::Parse(e)
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Verify admin credentials and return the admin's identity.
    ///
    /// # Errors
    ///
    /// Returns [`AdminApiError::InvalidCredentials`] when the API rejects
    /// the email/password pair.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminIdentity, AdminApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        self.post("/api/v1/admin/login", &request)
            .await
            .map_err(|e| match e {
                AdminApiError::Server { status: 401, .. } => AdminApiError::InvalidCredentials,
                other => other,
            })
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// List all inventory rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_inventory(&self) -> Result<Vec<InventoryItem>, AdminApiError> {
        self.get("/api/v1/admin/inventory").await
    }

    /// Apply a relative stock adjustment and return the updated row.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %adjustment.product_id, delta = adjustment.delta))]
    pub async fn adjust_stock(
        &self,
        adjustment: &StockAdjustment,
    ) -> Result<InventoryItem, AdminApiError> {
        self.post("/api/v1/admin/inventory/adjust", adjustment).await
    }

    /// Set an absolute stock level and return the updated row.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %set.product_id, quantity = set.quantity))]
    pub async fn set_stock(&self, set: &StockSet) -> Result<InventoryItem, AdminApiError> {
        self.post("/api/v1/admin/inventory/set", set).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List one page of orders, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        page: u32,
    ) -> Result<OrderPage, AdminApiError> {
        let path = match status {
            Some(status) => format!("/api/v1/admin/orders?status={status}&page={page}"),
            None => format!("/api/v1/admin/orders?page={page}"),
        };
        self.get(&path).await
    }

    /// Fetch one order with its lines and billing address.
    ///
    /// # Errors
    ///
    /// Returns [`AdminApiError::NotFound`] for an unknown order id.
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<OrderDetail, AdminApiError> {
        self.get(&format!("/api/v1/admin/orders/{order_id}"))
            .await
            .map_err(|e| match e {
                AdminApiError::Server { status: 404, .. } => {
                    AdminApiError::NotFound(format!("Order not found: {order_id}"))
                }
                other => other,
            })
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderDetail, AdminApiError> {
        self.post(
            &format!("/api/v1/admin/orders/{order_id}/status"),
            &StatusUpdate { status },
        )
        .await
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Fetch the sales report for an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn sales_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SalesReport, AdminApiError> {
        self.get(&format!("/api/v1/admin/reports/sales?from={from}&to={to}"))
            .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// List one page of store users.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_users(&self, page: u32) -> Result<UserPage, AdminApiError> {
        self.get(&format!("/api/v1/admin/users?page={page}")).await
    }

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn set_user_role(
        &self,
        user_id: UserId,
        role: UserRole,
    ) -> Result<types::StoreUser, AdminApiError> {
        self.post(
            &format!("/api/v1/admin/users/{user_id}/role"),
            &RoleUpdate { role },
        )
        .await
    }

    // =========================================================================
    // Audit log
    // =========================================================================

    /// List one page of the audit log, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_audit(&self, page: u32) -> Result<AuditPage, AdminApiError> {
        self.get(&format!("/api/v1/admin/audit?page={page}")).await
    }
}

/// Stock level below which an item is flagged on the inventory screen.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Whether an inventory row should be flagged as low stock.
#[must_use]
pub const fn is_low_stock(item: &InventoryItem) -> bool {
    item.stock <= LOW_STOCK_THRESHOLD
}
