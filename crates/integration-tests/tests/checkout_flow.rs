//! Checkout flow: pricing, submission gating, and payment hand-off.

#![allow(clippy::unwrap_used)]

use heartwood_core::{DeliveryOption, OrderId, PaymentType};
use rust_decimal::Decimal;

use heartwood_integration_tests::{ScriptedApi, complete_form, editing, gateway, line};
use heartwood_storefront::cart::{CartStore, MemoryCartStorage};
use heartwood_storefront::checkout::{CheckoutPhase, Quote, flow, monthly_payment};

async fn cart_with_subtotal_100() -> CartStore<MemoryCartStorage> {
    let mut cart = CartStore::open(MemoryCartStorage::default()).await;
    cart.add_item(line(1, 2, 50)).await;
    cart
}

// =============================================================================
// Pricing
// =============================================================================

#[test]
fn express_quote_matches_the_fee_table_and_tax_rate() {
    let quote = Quote::compute(Decimal::new(100, 0), DeliveryOption::Express);

    assert_eq!(quote.delivery_fee, Decimal::new(20, 0));
    assert_eq!(quote.tax, Decimal::new(15, 0));
    assert_eq!(quote.total, Decimal::new(135, 0));
}

#[test]
fn credit_installments_come_from_the_amortization_formula() {
    // R135 over 6 months at 2% monthly.
    let payment = monthly_payment(Decimal::new(135, 0), 6);
    assert_eq!(payment, Decimal::new(2410, 2));

    // A longer term means smaller installments but more interest overall.
    let longer = monthly_payment(Decimal::new(135, 0), 12);
    assert!(longer < payment);
    assert!(longer * Decimal::new(12, 0) > payment * Decimal::new(6, 0));
}

// =============================================================================
// Submission gating: every rule blocks the API call independently
// =============================================================================

#[tokio::test]
async fn unaccepted_terms_block_submission() {
    let api = ScriptedApi::accepting();
    let mut cart = cart_with_subtotal_100().await;

    let mut form = complete_form(PaymentType::Full);
    form.agreed_to_terms = false;

    let result = flow::submit(&api, &mut cart, &editing(form), &gateway()).await;
    assert!(result.is_err());
    assert_eq!(api.submit_count(), 0);
}

#[tokio::test]
async fn an_empty_cart_blocks_submission() {
    let api = ScriptedApi::accepting();
    let mut cart = CartStore::open(MemoryCartStorage::default()).await;

    let result = flow::submit(
        &api,
        &mut cart,
        &editing(complete_form(PaymentType::Full)),
        &gateway(),
    )
    .await;
    assert!(result.is_err());
    assert_eq!(api.submit_count(), 0);
}

#[tokio::test]
async fn out_of_range_credit_terms_block_submission() {
    for months in [0, 37] {
        let api = ScriptedApi::accepting();
        let mut cart = cart_with_subtotal_100().await;

        let mut form = complete_form(PaymentType::Credit);
        form.term_months = months;

        let result = flow::submit(&api, &mut cart, &editing(form), &gateway()).await;
        assert!(result.is_err(), "term of {months} months must be rejected");
        assert_eq!(api.submit_count(), 0);
    }
}

#[tokio::test]
async fn missing_billing_fields_block_submission() {
    let clears: [fn(&mut heartwood_storefront::checkout::CheckoutForm); 4] = [
        |form| form.billing.full_name.clear(),
        |form| form.billing.line1.clear(),
        |form| form.billing.city.clear(),
        |form| form.billing.postal_code.clear(),
    ];

    for clear in clears {
        let api = ScriptedApi::accepting();
        let mut cart = cart_with_subtotal_100().await;

        let mut form = complete_form(PaymentType::Full);
        clear(&mut form);

        let result = flow::submit(&api, &mut cart, &editing(form), &gateway()).await;
        assert!(result.is_err());
        assert_eq!(api.submit_count(), 0);
    }
}

// =============================================================================
// Full payment: order -> gateway -> confirmation
// =============================================================================

#[tokio::test]
async fn full_payment_runs_the_whole_gateway_round_trip() {
    let api = ScriptedApi::accepting();
    let mut cart = cart_with_subtotal_100().await;

    let awaiting = flow::submit(
        &api,
        &mut cart,
        &editing(complete_form(PaymentType::Full)),
        &gateway(),
    )
    .await
    .unwrap();

    // The order exists but the cart must survive until confirmation.
    let CheckoutPhase::AwaitingPayment { order_id, widget } = &awaiting.phase else {
        panic!("expected AwaitingPayment, got {:?}", awaiting.phase);
    };
    assert_eq!(*order_id, OrderId::new(1001));
    assert_eq!(widget.amount_minor_units, 13500);
    assert!(!cart.is_empty());

    let confirmed = flow::confirm_payment(&api, &mut cart, &awaiting, "txn_42").await;
    assert_eq!(
        confirmed.phase,
        CheckoutPhase::Confirmed {
            order_id: OrderId::new(1001)
        }
    );
    assert!(cart.is_empty());

    let calls = api.confirmed.lock().unwrap();
    assert_eq!(calls.as_slice(), &[(OrderId::new(1001), "txn_42".to_string())]);
}

#[tokio::test]
async fn a_failed_confirmation_preserves_the_cart_for_retry() {
    let api = ScriptedApi::rejecting_confirmations();
    let mut cart = cart_with_subtotal_100().await;
    let lines_before = cart.lines().to_vec();

    let awaiting = flow::submit(
        &api,
        &mut cart,
        &editing(complete_form(PaymentType::Full)),
        &gateway(),
    )
    .await
    .unwrap();
    let failed = flow::confirm_payment(&api, &mut cart, &awaiting, "txn_42").await;

    assert!(matches!(failed.phase, CheckoutPhase::Failed { .. }));
    assert_eq!(cart.lines(), lines_before.as_slice());
}

// =============================================================================
// Credit payment: no gateway involved
// =============================================================================

#[tokio::test]
async fn credit_orders_confirm_immediately_and_clear_the_cart() {
    let api = ScriptedApi::accepting();
    let mut cart = cart_with_subtotal_100().await;

    let state = flow::submit(
        &api,
        &mut cart,
        &editing(complete_form(PaymentType::Credit)),
        &gateway(),
    )
    .await
    .unwrap();

    assert!(matches!(state.phase, CheckoutPhase::Confirmed { .. }));
    assert!(cart.is_empty());
    assert!(api.confirmed.lock().unwrap().is_empty());

    let request = api.submitted.lock().unwrap().pop().unwrap();
    assert_eq!(request.payment_type, PaymentType::Credit);
    assert_eq!(request.term_months, Some(6));
}

// =============================================================================
// Failed submission
// =============================================================================

#[tokio::test]
async fn a_rejected_order_keeps_the_cart_and_fails_the_session() {
    let api = ScriptedApi::rejecting_orders();
    let mut cart = cart_with_subtotal_100().await;

    let state = flow::submit(
        &api,
        &mut cart,
        &editing(complete_form(PaymentType::Full)),
        &gateway(),
    )
    .await
    .unwrap();

    assert!(matches!(state.phase, CheckoutPhase::Failed { .. }));
    assert!(!cart.is_empty());
    assert_eq!(api.submit_count(), 1);
}

#[tokio::test]
async fn retrying_an_unchanged_order_reuses_the_idempotency_key() {
    let api = ScriptedApi::rejecting_orders();
    let mut cart = cart_with_subtotal_100().await;
    let state = editing(complete_form(PaymentType::Full));

    let failed = flow::submit(&api, &mut cart, &state, &gateway()).await.unwrap();

    // The customer fixes nothing and just submits again from the failed
    // state: the API sees the same key and cannot create a second order.
    flow::submit(&api, &mut cart, &failed, &gateway())
        .await
        .unwrap();

    let submitted = api.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0].idempotency_key, submitted[1].idempotency_key);
}
