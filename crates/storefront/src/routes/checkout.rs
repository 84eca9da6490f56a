//! Checkout route handlers.
//!
//! The checkout state machine lives in the session between requests so it
//! survives the round-trip through the payment gateway widget. Every
//! handler loads the snapshot, feeds actions or flow calls through it, and
//! stores the result back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use heartwood_core::{BillingAddress, DeliveryOption, PaymentType};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{CartStorage, CartStore};
use crate::checkout::{
    CheckoutAction, CheckoutPhase, CheckoutState, PaymentWidgetConfig, Quote, flow,
    monthly_payment, pricing,
};
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::session_keys;
use crate::state::AppState;

use super::cart::{CartView, open_cart};

/// Raw checkout form submission.
///
/// Everything arrives as loosely-typed form input; the state machine and
/// validation decide what it means.
#[derive(Debug, Deserialize)]
pub struct CheckoutFormInput {
    pub delivery_option: DeliveryOption,
    pub payment_type: u8,
    pub term_months: Option<String>,
    pub agreed_to_terms: Option<String>,
    pub email: String,
    pub full_name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
}

/// Payment gateway success callback payload.
#[derive(Debug, Deserialize)]
pub struct PaymentCompleteForm {
    pub transaction_ref: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub quote: Quote,
    pub monthly: Decimal,
    pub delivery: String,
    pub is_credit: bool,
    pub term_months: u32,
    pub agreed_to_terms: bool,
    pub email: String,
    pub billing: BillingAddress,
    pub fee_standard: Decimal,
    pub fee_express: Decimal,
    pub error: String,
}

/// Payment page template: bootstraps the gateway widget.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/payment.html")]
pub struct PaymentTemplate {
    pub widget: PaymentWidgetConfig,
    pub total: Decimal,
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn load_checkout(session: &Session) -> CheckoutState {
    match session.get::<CheckoutState>(session_keys::CHECKOUT).await {
        Ok(state) => state.unwrap_or_default(),
        Err(e) => {
            tracing::debug!("Could not read checkout state, starting fresh: {e}");
            CheckoutState::default()
        }
    }
}

async fn store_checkout(session: &Session, state: &CheckoutState) {
    if let Err(e) = session.insert(session_keys::CHECKOUT, state).await {
        tracing::warn!("Failed to persist checkout state to session: {e}");
    }
}

fn checkout_page<S: CartStorage>(
    cart: &CartStore<S>,
    state: &CheckoutState,
    error: Option<String>,
) -> CheckoutTemplate {
    let form = &state.form;
    let quote = Quote::compute(cart.total(), form.delivery_option);

    CheckoutTemplate {
        cart: CartView::from_store(cart),
        quote,
        monthly: monthly_payment(quote.total, form.term_months),
        delivery: form.delivery_option.to_string(),
        is_credit: form.payment_type == PaymentType::Credit,
        term_months: form.term_months,
        agreed_to_terms: form.agreed_to_terms,
        email: form.email.clone(),
        billing: form.billing.clone(),
        fee_standard: pricing::delivery_fee(DeliveryOption::Standard),
        fee_express: pricing::delivery_fee(DeliveryOption::Express),
        error: error.unwrap_or_default(),
    }
}

fn apply_input(state: &CheckoutState, input: CheckoutFormInput) -> Result<CheckoutState> {
    let payment_type = PaymentType::from_discriminant(input.payment_type)
        .ok_or_else(|| AppError::BadRequest("Unknown payment type".to_string()))?;

    // Non-numeric terms become 0 and fail range validation with the same
    // message a customer-visible 0 would.
    let term_months = input
        .term_months
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(0);

    let billing = BillingAddress {
        full_name: input.full_name,
        line1: input.line1,
        line2: input.line2.filter(|line| !line.trim().is_empty()),
        city: input.city,
        postal_code: input.postal_code,
    };

    Ok(state
        .apply(CheckoutAction::SetDeliveryOption(input.delivery_option))
        .apply(CheckoutAction::SetPaymentType(payment_type))
        .apply(CheckoutAction::SetTermMonths(term_months))
        .apply(CheckoutAction::SetAgreedToTerms(
            input.agreed_to_terms.is_some(),
        ))
        .apply(CheckoutAction::SetEmail(input.email))
        .apply(CheckoutAction::SetBillingAddress(billing)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout page.
///
/// An empty cart has nothing to check out and redirects back. A session
/// already awaiting payment re-renders the payment page instead of the
/// form, so a refresh cannot drop an in-flight payment.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Response {
    let cart = open_cart(&session).await;
    let state = load_checkout(&session).await;

    if let CheckoutPhase::AwaitingPayment { widget, .. } = &state.phase {
        return PaymentTemplate {
            widget: widget.clone(),
            total: Decimal::new(widget.amount_minor_units, 2),
        }
        .into_response();
    }

    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let error = state.failure_message().map(String::from);
    checkout_page(&cart, &state, error).into_response()
}

/// Submit the checkout.
#[instrument(skip(state, session, input))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<CheckoutFormInput>,
) -> Result<Response> {
    let mut cart = open_cart(&session).await;
    let edited = apply_input(&load_checkout(&session).await, input)?;

    let next = match flow::submit(
        state.checkout(),
        &mut cart,
        &edited,
        &state.config().gateway,
    )
    .await
    {
        Ok(next) => next,
        Err(validation) => {
            // Validation failures never left this process; keep the edits
            // so the customer can fix the one field that failed.
            store_checkout(&session, &edited).await;
            return Ok(checkout_page(&cart, &edited, Some(validation.to_string())).into_response());
        }
    };

    store_checkout(&session, &next).await;

    match &next.phase {
        CheckoutPhase::AwaitingPayment { widget, .. } => Ok(PaymentTemplate {
            widget: widget.clone(),
            total: Decimal::new(widget.amount_minor_units, 2),
        }
        .into_response()),
        CheckoutPhase::Confirmed { order_id } => {
            let destination = format!("/orders/{order_id}?placed=1");
            store_checkout(&session, &CheckoutState::default()).await;
            Ok(Redirect::to(&destination).into_response())
        }
        CheckoutPhase::Failed { message } => {
            Ok(checkout_page(&cart, &next, Some(message.clone())).into_response())
        }
        _ => Ok(Redirect::to("/checkout").into_response()),
    }
}

/// Payment gateway success callback.
///
/// The gateway reports a transaction reference; the order is only treated
/// as paid once the order API has confirmed it. A failed confirmation
/// keeps the cart and the awaiting state so the customer can retry.
#[instrument(skip(state, session, input))]
pub async fn payment_complete(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<PaymentCompleteForm>,
) -> Response {
    let mut cart = open_cart(&session).await;
    let current = load_checkout(&session).await;

    let next = flow::confirm_payment(
        state.checkout(),
        &mut cart,
        &current,
        &input.transaction_ref,
    )
    .await;

    match &next.phase {
        CheckoutPhase::Confirmed { order_id } => {
            let destination = format!("/orders/{order_id}?placed=1");
            store_checkout(&session, &CheckoutState::default()).await;
            Redirect::to(&destination).into_response()
        }
        CheckoutPhase::Failed { message } => {
            store_checkout(&session, &next).await;
            checkout_page(&cart, &next, Some(message.clone())).into_response()
        }
        // A stale or duplicated callback changes nothing.
        _ => Redirect::to("/checkout").into_response(),
    }
}

/// Payment gateway dismissed without paying.
#[instrument(skip(session))]
pub async fn payment_closed(session: Session) -> Response {
    let state = load_checkout(&session).await;
    let next = state.apply(CheckoutAction::WidgetClosed);
    store_checkout(&session, &next).await;
    Redirect::to("/checkout").into_response()
}
