//! Integration tests for Heartwood.
//!
//! The cart and checkout flows are exercised end to end against in-memory
//! storage and a scripted stand-in for the order API - no live services.
//!
//! # Test Categories
//!
//! - `cart_store` - Cart mutation and persistence behavior
//! - `checkout_flow` - Pricing, submission gating, and payment hand-off
//!
//! This crate's library is the shared test support: cart line builders, a
//! complete checkout form, and the scripted API.

// Test support code; panicking on poisoned mutexes is fine here.
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use heartwood_core::{
    BillingAddress, CurrencyCode, DeliveryOption, OrderId, PaymentType, ProductId,
};
use rust_decimal::Decimal;

use heartwood_storefront::api::ApiError;
use heartwood_storefront::api::types::OrderRequest;
use heartwood_storefront::cart::CartLine;
use heartwood_storefront::checkout::{CheckoutApi, CheckoutForm, CheckoutPhase, CheckoutState};
use heartwood_storefront::config::GatewayConfig;

/// A cart line with a rand price, for seeding carts.
#[must_use]
pub fn line(id: i64, quantity: u32, price: i64) -> CartLine {
    CartLine {
        product_id: ProductId::new(id),
        name: format!("Product {id}"),
        unit_price: Decimal::new(price, 0),
        image: None,
        quantity,
    }
}

/// A checkout form that passes validation.
#[must_use]
pub fn complete_form(payment_type: PaymentType) -> CheckoutForm {
    CheckoutForm {
        delivery_option: DeliveryOption::Express,
        payment_type,
        term_months: 6,
        agreed_to_terms: true,
        email: "buyer@example.com".to_string(),
        billing: BillingAddress {
            full_name: "N. Mokoena".to_string(),
            line1: "12 Baobab Street".to_string(),
            line2: None,
            city: "Pretoria".to_string(),
            postal_code: "0181".to_string(),
        },
    }
}

/// A checkout state in the editing phase with the given form.
#[must_use]
pub fn editing(form: CheckoutForm) -> CheckoutState {
    CheckoutState {
        form,
        phase: CheckoutPhase::Editing,
        submission_key: None,
    }
}

/// Test gateway configuration.
#[must_use]
pub fn gateway() -> GatewayConfig {
    GatewayConfig {
        public_key: "pk_test_1234".to_string(),
        currency: CurrencyCode::ZAR,
    }
}

/// Scripted stand-in for the order API.
///
/// Records every call; failures are scripted per method.
#[derive(Default)]
pub struct ScriptedApi {
    pub submitted: Mutex<Vec<OrderRequest>>,
    pub confirmed: Mutex<Vec<(OrderId, String)>>,
    submit_fails: AtomicBool,
    confirm_fails: AtomicBool,
}

impl ScriptedApi {
    /// An API that accepts everything.
    #[must_use]
    pub fn accepting() -> Self {
        Self::default()
    }

    /// An API whose order submission fails.
    #[must_use]
    pub fn rejecting_orders() -> Self {
        let api = Self::default();
        api.submit_fails.store(true, Ordering::SeqCst);
        api
    }

    /// An API whose payment confirmation fails.
    #[must_use]
    pub fn rejecting_confirmations() -> Self {
        let api = Self::default();
        api.confirm_fails.store(true, Ordering::SeqCst);
        api
    }

    /// Number of order submissions received.
    #[must_use]
    pub fn submit_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

impl CheckoutApi for ScriptedApi {
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderId, ApiError> {
        self.submitted.lock().unwrap().push(request.clone());
        if self.submit_fails.load(Ordering::SeqCst) {
            Err(ApiError::Server {
                status: 500,
                code: None,
                message: "scripted failure".to_string(),
            })
        } else {
            Ok(OrderId::new(1001))
        }
    }

    async fn confirm_payment(
        &self,
        order_id: OrderId,
        transaction_ref: &str,
    ) -> Result<(), ApiError> {
        self.confirmed
            .lock()
            .unwrap()
            .push((order_id, transaction_ref.to_string()));
        if self.confirm_fails.load(Ordering::SeqCst) {
            Err(ApiError::Server {
                status: 502,
                code: None,
                message: "scripted failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
