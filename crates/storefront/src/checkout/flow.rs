//! Checkout submission driver.
//!
//! Drives one checkout session through the phase machine: validate, submit
//! the order, hand off to the payment gateway for full payment, confirm,
//! and clear the cart at the right moment. The cart is only cleared once
//! the order no longer needs it: immediately for credit orders, after
//! payment confirmation for full payment. A failed confirmation leaves the
//! cart exactly as it was so the customer can retry without re-entering
//! anything; the idempotency key on the order request keeps that retry
//! from creating a second order.

use heartwood_core::{Email, Money, OrderId, PaymentType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::types::{OrderLineInput, OrderRequest};
use crate::api::{ApiError, codes};
use crate::cart::{CartLine, CartStorage, CartStore};
use crate::config::GatewayConfig;

use super::pricing::Quote;
use super::state::{CheckoutAction, CheckoutForm, CheckoutPhase, CheckoutState, ValidationError};

/// The order surface of the Heartwood API, as the checkout flow sees it.
///
/// The storefront's HTTP client implements this; tests substitute a
/// scripted mock.
pub trait CheckoutApi: Send + Sync {
    /// Submit an order and return its id.
    fn submit_order(
        &self,
        request: &OrderRequest,
    ) -> impl Future<Output = Result<OrderId, ApiError>> + Send;

    /// Report a successful gateway payment for an order.
    fn confirm_payment(
        &self,
        order_id: OrderId,
        transaction_ref: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Configuration handed to the embedded payment widget.
///
/// Serialized to JSON (camelCase, as the gateway script expects) and
/// rendered into the payment page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWidgetConfig {
    /// Payment reference: the order id.
    pub reference: String,
    /// Buyer email.
    pub email: String,
    /// Amount in minor currency units (cents).
    pub amount_minor_units: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Publishable gateway key.
    pub public_key: String,
}

/// Validate and submit the checkout.
///
/// Returns the next [`CheckoutState`]:
/// - `AwaitingPayment` for an accepted full-payment order (cart kept),
/// - `Confirmed` for an accepted credit order (cart cleared),
/// - `Failed` when the order API rejects the submission (cart kept).
///
/// # Errors
///
/// Returns a [`ValidationError`] when the form fails pre-submission
/// validation; no network call is made in that case.
pub async fn submit<A: CheckoutApi, S: CartStorage>(
    api: &A,
    cart: &mut CartStore<S>,
    state: &CheckoutState,
    gateway: &GatewayConfig,
) -> Result<CheckoutState, ValidationError> {
    let email = super::state::validate(&state.form, cart.lines())?;

    // Reuse the attempt's idempotency key on retries; the key only changes
    // when the form does.
    let key = state.submission_key.unwrap_or_else(Uuid::new_v4);
    let state = state.apply(CheckoutAction::SubmitStarted { key });
    let request = build_order_request(cart.lines(), &state.form, &email, key);
    let quote = Quote::compute(cart.total(), state.form.delivery_option);

    match api.submit_order(&request).await {
        Ok(order_id) => {
            if state.form.payment_type == PaymentType::Credit {
                cart.clear().await;
                Ok(state.apply(CheckoutAction::OrderAccepted {
                    order_id,
                    widget: None,
                }))
            } else {
                let widget = widget_config(order_id, &email, quote.total, gateway);
                Ok(state.apply(CheckoutAction::OrderAccepted {
                    order_id,
                    widget: Some(widget),
                }))
            }
        }
        Err(e) => {
            tracing::warn!("Order submission failed: {e}");
            Ok(state.apply(CheckoutAction::SubmitFailed {
                message: submission_error_message(&e),
            }))
        }
    }
}

/// Confirm a gateway payment for the order awaiting it.
///
/// Only legal in `AwaitingPayment`; any other phase returns the state
/// unchanged (a stale or duplicated gateway callback). On success the cart
/// is cleared; on failure it is left intact, because the order already
/// exists server-side and clearing would make it look lost.
pub async fn confirm_payment<A: CheckoutApi, S: CartStorage>(
    api: &A,
    cart: &mut CartStore<S>,
    state: &CheckoutState,
    transaction_ref: &str,
) -> CheckoutState {
    let CheckoutPhase::AwaitingPayment { order_id, .. } = &state.phase else {
        return state.clone();
    };

    match api.confirm_payment(*order_id, transaction_ref).await {
        Ok(()) => {
            cart.clear().await;
            state.apply(CheckoutAction::PaymentConfirmed)
        }
        Err(e) => {
            tracing::warn!(order_id = %order_id, "Payment confirmation failed: {e}");
            state.apply(CheckoutAction::ConfirmationFailed {
                message: "Your payment went through but we could not confirm it with the store. \
                          Please try again - your order has not been lost."
                    .to_string(),
            })
        }
    }
}

fn build_order_request(
    lines: &[CartLine],
    form: &CheckoutForm,
    email: &Email,
    key: Uuid,
) -> OrderRequest {
    OrderRequest {
        idempotency_key: key,
        lines: lines
            .iter()
            .map(|line| OrderLineInput {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect(),
        delivery_option: form.delivery_option,
        payment_type: form.payment_type,
        term_months: match form.payment_type {
            PaymentType::Credit => Some(form.term_months),
            PaymentType::Full => None,
        },
        billing_address: form.billing.clone(),
        email: email.as_str().to_string(),
    }
}

fn widget_config(
    order_id: OrderId,
    email: &Email,
    total: Decimal,
    gateway: &GatewayConfig,
) -> PaymentWidgetConfig {
    PaymentWidgetConfig {
        reference: order_id.to_string(),
        email: email.as_str().to_string(),
        amount_minor_units: Money::new(total, gateway.currency).minor_units(),
        currency: gateway.currency.code().to_string(),
        public_key: gateway.public_key.clone(),
    }
}

fn submission_error_message(error: &ApiError) -> String {
    if error.code() == Some(codes::INVALID_TERM_MONTHS) {
        "The selected credit term was rejected. Please choose between 1 and 36 months."
            .to_string()
    } else {
        "We could not place your order. Please check your connection and try again.".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use heartwood_core::{BillingAddress, CurrencyCode, DeliveryOption, PaymentType, ProductId};

    use super::*;
    use crate::cart::MemoryCartStorage;
    use crate::checkout::state::validate;

    /// Scripted stand-in for the order API.
    #[derive(Default)]
    struct MockApi {
        submitted: Mutex<Vec<OrderRequest>>,
        confirmed: Mutex<Vec<(OrderId, String)>>,
        fail_submit: Option<ApiError>,
        fail_confirm: AtomicBool,
    }

    impl MockApi {
        fn failing_submit(error: ApiError) -> Self {
            Self {
                fail_submit: Some(error),
                ..Self::default()
            }
        }

        fn failing_confirm() -> Self {
            let api = Self::default();
            api.fail_confirm.store(true, Ordering::SeqCst);
            api
        }

        fn submit_count(&self) -> usize {
            self.submitted.lock().unwrap().len()
        }
    }

    impl CheckoutApi for MockApi {
        async fn submit_order(&self, request: &OrderRequest) -> Result<OrderId, ApiError> {
            self.submitted.lock().unwrap().push(request.clone());
            match &self.fail_submit {
                Some(ApiError::Server {
                    status,
                    code,
                    message,
                }) => Err(ApiError::Server {
                    status: *status,
                    code: code.clone(),
                    message: message.clone(),
                }),
                Some(_) => Err(ApiError::NotFound("scripted".to_string())),
                None => Ok(OrderId::new(1001)),
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
            if self.fail_confirm.load(Ordering::SeqCst) {
                Err(ApiError::Server {
                    status: 502,
                    code: None,
                    message: "gateway unreachable".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn gateway() -> GatewayConfig {
        GatewayConfig {
            public_key: "pk_test_1234".to_string(),
            currency: CurrencyCode::ZAR,
        }
    }

    fn form(payment_type: PaymentType) -> CheckoutForm {
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

    async fn cart_with_subtotal_100() -> CartStore<MemoryCartStorage> {
        let mut cart = CartStore::open(MemoryCartStorage::default()).await;
        cart.add_item(CartLine {
            product_id: ProductId::new(1),
            name: "Side table".to_string(),
            unit_price: Decimal::new(50, 0),
            image: None,
            quantity: 2,
        })
        .await;
        cart
    }

    fn editing(form: CheckoutForm) -> CheckoutState {
        CheckoutState {
            form,
            phase: CheckoutPhase::Editing,
            submission_key: None,
        }
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_api_call() {
        let api = MockApi::default();
        let mut cart = cart_with_subtotal_100().await;

        let mut bad = form(PaymentType::Full);
        bad.agreed_to_terms = false;

        let result = submit(&api, &mut cart, &editing(bad), &gateway()).await;
        assert_eq!(result.unwrap_err(), ValidationError::TermsNotAccepted);
        assert_eq!(api.submit_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_cart_makes_no_api_call() {
        let api = MockApi::default();
        let mut cart = CartStore::open(MemoryCartStorage::default()).await;

        let result = submit(&api, &mut cart, &editing(form(PaymentType::Full)), &gateway()).await;
        assert_eq!(result.unwrap_err(), ValidationError::EmptyCart);
        assert_eq!(api.submit_count(), 0);
    }

    #[tokio::test]
    async fn test_bad_credit_term_makes_no_api_call() {
        let api = MockApi::default();
        let mut cart = cart_with_subtotal_100().await;

        let mut bad = form(PaymentType::Credit);
        bad.term_months = 37;

        let result = submit(&api, &mut cart, &editing(bad), &gateway()).await;
        assert_eq!(result.unwrap_err(), ValidationError::InvalidTermMonths(37));
        assert_eq!(api.submit_count(), 0);
    }

    #[tokio::test]
    async fn test_full_payment_enters_awaiting_payment_with_widget() {
        let api = MockApi::default();
        let mut cart = cart_with_subtotal_100().await;

        let state = submit(&api, &mut cart, &editing(form(PaymentType::Full)), &gateway())
            .await
            .unwrap();

        let CheckoutPhase::AwaitingPayment { order_id, widget } = &state.phase else {
            panic!("expected AwaitingPayment, got {:?}", state.phase);
        };
        assert_eq!(*order_id, OrderId::new(1001));
        assert_eq!(widget.reference, "1001");
        assert_eq!(widget.email, "buyer@example.com");
        // Subtotal 100 + express 20 + 15% tax on subtotal = 135.00 -> 13500 cents
        assert_eq!(widget.amount_minor_units, 13500);
        assert_eq!(widget.currency, "ZAR");

        // The cart must survive until the payment is confirmed.
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn test_credit_payment_confirms_and_clears_cart() {
        let api = MockApi::default();
        let mut cart = cart_with_subtotal_100().await;

        let state = submit(
            &api,
            &mut cart,
            &editing(form(PaymentType::Credit)),
            &gateway(),
        )
        .await
        .unwrap();

        assert_eq!(
            state.phase,
            CheckoutPhase::Confirmed {
                order_id: OrderId::new(1001)
            }
        );
        assert!(cart.is_empty());

        let request = api.submitted.lock().unwrap().pop().unwrap();
        assert_eq!(request.term_months, Some(6));
        assert_eq!(request.payment_type, PaymentType::Credit);
    }

    #[tokio::test]
    async fn test_full_payment_request_omits_term_months() {
        let api = MockApi::default();
        let mut cart = cart_with_subtotal_100().await;

        submit(&api, &mut cart, &editing(form(PaymentType::Full)), &gateway())
            .await
            .unwrap();

        let request = api.submitted.lock().unwrap().pop().unwrap();
        assert_eq!(request.term_months, None);
    }

    #[tokio::test]
    async fn test_submission_failure_keeps_cart_and_reports() {
        let api = MockApi::failing_submit(ApiError::Server {
            status: 500,
            code: None,
            message: "boom".to_string(),
        });
        let mut cart = cart_with_subtotal_100().await;

        let state = submit(&api, &mut cart, &editing(form(PaymentType::Full)), &gateway())
            .await
            .unwrap();

        assert!(matches!(state.phase, CheckoutPhase::Failed { .. }));
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_term_error_code_gets_tailored_message() {
        let api = MockApi::failing_submit(ApiError::Server {
            status: 422,
            code: Some(codes::INVALID_TERM_MONTHS.to_string()),
            message: "term out of range".to_string(),
        });
        let mut cart = cart_with_subtotal_100().await;

        let state = submit(
            &api,
            &mut cart,
            &editing(form(PaymentType::Credit)),
            &gateway(),
        )
        .await
        .unwrap();

        assert!(
            state
                .failure_message()
                .unwrap()
                .contains("between 1 and 36 months")
        );
    }

    #[tokio::test]
    async fn test_confirmation_success_clears_cart() {
        let api = MockApi::default();
        let mut cart = cart_with_subtotal_100().await;

        let awaiting = submit(&api, &mut cart, &editing(form(PaymentType::Full)), &gateway())
            .await
            .unwrap();
        let state = confirm_payment(&api, &mut cart, &awaiting, "txn_abc123").await;

        assert_eq!(
            state.phase,
            CheckoutPhase::Confirmed {
                order_id: OrderId::new(1001)
            }
        );
        assert!(cart.is_empty());

        let confirmed = api.confirmed.lock().unwrap().pop().unwrap();
        assert_eq!(confirmed, (OrderId::new(1001), "txn_abc123".to_string()));
    }

    #[tokio::test]
    async fn test_confirmation_failure_keeps_cart_intact() {
        let api = MockApi::failing_confirm();
        let mut cart = cart_with_subtotal_100().await;
        let lines_before = cart.lines().to_vec();

        let awaiting = submit(&api, &mut cart, &editing(form(PaymentType::Full)), &gateway())
            .await
            .unwrap();
        let state = confirm_payment(&api, &mut cart, &awaiting, "txn_abc123").await;

        assert!(matches!(state.phase, CheckoutPhase::Failed { .. }));
        assert_eq!(cart.lines(), lines_before.as_slice());
    }

    #[tokio::test]
    async fn test_confirmation_outside_awaiting_payment_is_ignored() {
        let api = MockApi::default();
        let mut cart = cart_with_subtotal_100().await;

        let state = editing(form(PaymentType::Full));
        let after = confirm_payment(&api, &mut cart, &state, "txn_abc123").await;

        assert_eq!(after, state);
        assert!(api.confirmed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retry_reuses_the_submission_key_until_the_form_changes() {
        let api = MockApi::failing_submit(ApiError::Server {
            status: 500,
            code: None,
            message: "boom".to_string(),
        });
        let mut cart = cart_with_subtotal_100().await;

        let failed = submit(&api, &mut cart, &editing(form(PaymentType::Full)), &gateway())
            .await
            .unwrap();
        submit(&api, &mut cart, &failed, &gateway()).await.unwrap();

        // An unchanged retry must not be able to create a second order.
        {
            let submitted = api.submitted.lock().unwrap();
            assert_eq!(submitted[0].idempotency_key, submitted[1].idempotency_key);
        }

        // Changing the form is a new order intent and gets a new key.
        let edited = failed.apply(CheckoutAction::SetTermMonths(24));
        submit(&api, &mut cart, &edited, &gateway()).await.unwrap();
        let submitted = api.submitted.lock().unwrap();
        assert_ne!(submitted[1].idempotency_key, submitted[2].idempotency_key);
    }

    #[test]
    fn test_validate_is_reexported_for_handlers() {
        // The route layer validates through the same function the flow uses.
        let result = validate(&form(PaymentType::Full), &[]);
        assert_eq!(result.unwrap_err(), ValidationError::EmptyCart);
    }
}
