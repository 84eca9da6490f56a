//! Checkout API client: order submission, payment confirmation, tracking.
//!
//! Nothing here is cached or retried: an order submission is fire-once,
//! and any retry is the customer re-submitting (made safe server-side by
//! the idempotency key on the request).

use std::sync::Arc;

use heartwood_core::OrderId;
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::checkout::CheckoutApi;
use crate::config::ApiConfig;

use super::types::{Order, OrderRequest, PaymentConfirmation, SubmittedOrder};
use super::{ApiError, read_json, read_ok};

/// Client for the order surface of the Heartwood API.
#[derive(Clone)]
pub struct CheckoutClient {
    inner: Arc<CheckoutClientInner>,
}

struct CheckoutClientInner {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl CheckoutClient {
    /// Create a new checkout client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            inner: Arc::new(CheckoutClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                token: config.token.expose_secret().to_string(),
            }),
        }
    }

    async fn post<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .post(format!("{}{path}", self.inner.base_url))
            .bearer_auth(&self.inner.token)
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch a placed order for the tracking/confirmation view.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown order id, or another
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, ApiError> {
        let response = self
            .inner
            .client
            .get(format!("{}/api/v1/orders/{order_id}", self.inner.base_url))
            .bearer_auth(&self.inner.token)
            .send()
            .await?;

        read_json(response).await.map_err(|e| match e {
            ApiError::Server { status: 404, .. } => {
                ApiError::NotFound(format!("Order not found: {order_id}"))
            }
            other => other,
        })
    }
}

impl CheckoutApi for CheckoutClient {
    /// Submit an order and return its id.
    #[instrument(skip(self, request), fields(payment_type = request.payment_type.discriminant()))]
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderId, ApiError> {
        let submitted: SubmittedOrder = self.post("/api/v1/orders", request).await?;
        tracing::info!(order_id = %submitted.order_id, "Order accepted");
        Ok(submitted.order_id)
    }

    /// Report a successful gateway payment for an order.
    #[instrument(skip(self, transaction_ref))]
    async fn confirm_payment(
        &self,
        order_id: OrderId,
        transaction_ref: &str,
    ) -> Result<(), ApiError> {
        let confirmation = PaymentConfirmation {
            transaction_ref: transaction_ref.to_string(),
        };
        let response = self
            .inner
            .client
            .post(format!(
                "{}/api/v1/orders/{order_id}/payment-confirmation",
                self.inner.base_url
            ))
            .bearer_auth(&self.inner.token)
            .json(&confirmation)
            .send()
            .await?;
        read_ok(response).await
    }
}
