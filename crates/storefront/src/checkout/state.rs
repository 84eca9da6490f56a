//! Checkout state machine.
//!
//! One checkout session is a form plus an explicit phase:
//!
//! ```text
//! Editing -> Submitting -> AwaitingPayment -> Confirmed
//!                       \-> Confirmed            (credit orders)
//!                       \-> Failed -> Editing    (on the next edit/submit)
//! ```
//!
//! All transitions go through [`CheckoutState::apply`], a pure function
//! over a closed set of [`CheckoutAction`]s. Actions that are illegal in
//! the current phase leave the state unchanged, so a stale payment
//! callback or a double-submit cannot corrupt the session snapshot.

use heartwood_core::{BillingAddress, DeliveryOption, Email, OrderId, PaymentType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cart::CartLine;

use super::flow::PaymentWidgetConfig;

/// Valid range for credit terms, in months.
pub const MIN_TERM_MONTHS: u32 = 1;
pub const MAX_TERM_MONTHS: u32 = 36;

/// Everything the customer fills in on the checkout screen.
///
/// Field-level updates accept any value; validation runs once at
/// submission so the customer is never blocked mid-edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub delivery_option: DeliveryOption,
    pub payment_type: PaymentType,
    /// Months of installment credit; meaningful only for credit payment.
    pub term_months: u32,
    pub agreed_to_terms: bool,
    /// Raw email input, parsed at submission.
    pub email: String,
    pub billing: BillingAddress,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            delivery_option: DeliveryOption::default(),
            payment_type: PaymentType::default(),
            term_months: 12,
            agreed_to_terms: false,
            email: String::new(),
            billing: BillingAddress::default(),
        }
    }
}

/// Where a checkout session currently is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// The customer is filling in the form.
    #[default]
    Editing,
    /// The order request is in flight.
    Submitting,
    /// The order exists server-side; the payment gateway widget is open.
    AwaitingPayment {
        order_id: OrderId,
        widget: PaymentWidgetConfig,
    },
    /// The order is placed (and, for full payment, confirmed).
    Confirmed { order_id: OrderId },
    /// The last submission or confirmation attempt failed.
    Failed { message: String },
}

/// One checkout session's state: the form plus the phase machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CheckoutState {
    pub form: CheckoutForm,
    pub phase: CheckoutPhase,
    /// Idempotency key for the current submission attempt.
    ///
    /// Assigned when a submission starts and kept across retries, so
    /// re-submitting the same order cannot create it twice server-side.
    /// Editing any field starts a new attempt and drops the key.
    pub submission_key: Option<Uuid>,
}

/// The closed set of things that can happen to a checkout session.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutAction {
    SetDeliveryOption(DeliveryOption),
    SetPaymentType(PaymentType),
    SetTermMonths(u32),
    SetAgreedToTerms(bool),
    SetEmail(String),
    SetBillingAddress(BillingAddress),
    /// Validation passed and the order request is about to be sent under
    /// the given idempotency key.
    SubmitStarted { key: Uuid },
    /// The order API accepted the order. A widget configuration is present
    /// exactly when a gateway payment has to happen before confirmation.
    OrderAccepted {
        order_id: OrderId,
        widget: Option<PaymentWidgetConfig>,
    },
    /// The gateway payment was confirmed with the order API.
    PaymentConfirmed,
    /// The order submission failed; the cart is untouched.
    SubmitFailed { message: String },
    /// Payment confirmation failed after the order was created server-side.
    ConfirmationFailed { message: String },
    /// The customer dismissed the payment widget without paying.
    WidgetClosed,
    /// Start a fresh checkout session.
    Reset,
}

impl CheckoutState {
    /// Apply one action, returning the next state.
    ///
    /// Actions that are not legal in the current phase return the state
    /// unchanged.
    #[must_use]
    pub fn apply(&self, action: CheckoutAction) -> Self {
        use CheckoutAction as A;
        use CheckoutPhase as P;

        match action {
            A::SetDeliveryOption(option) => self.edit(|form| form.delivery_option = option),
            A::SetPaymentType(payment_type) => self.edit(|form| form.payment_type = payment_type),
            A::SetTermMonths(months) => self.edit(|form| form.term_months = months),
            A::SetAgreedToTerms(agreed) => self.edit(|form| form.agreed_to_terms = agreed),
            A::SetEmail(email) => self.edit(|form| form.email = email),
            A::SetBillingAddress(billing) => self.edit(|form| form.billing = billing),

            A::SubmitStarted { key } => match self.phase {
                P::Editing | P::Failed { .. } => Self {
                    form: self.form.clone(),
                    phase: P::Submitting,
                    submission_key: Some(key),
                },
                _ => self.clone(),
            },

            A::OrderAccepted { order_id, widget } => match self.phase {
                P::Submitting => match widget {
                    Some(widget) => self.with_phase(P::AwaitingPayment { order_id, widget }),
                    None => self.with_phase(P::Confirmed { order_id }),
                },
                _ => self.clone(),
            },

            A::PaymentConfirmed => match &self.phase {
                P::AwaitingPayment { order_id, .. } => {
                    let order_id = *order_id;
                    self.with_phase(P::Confirmed { order_id })
                }
                _ => self.clone(),
            },

            A::SubmitFailed { message } => match self.phase {
                P::Submitting => self.with_phase(P::Failed { message }),
                _ => self.clone(),
            },

            A::ConfirmationFailed { message } => match self.phase {
                P::AwaitingPayment { .. } => self.with_phase(P::Failed { message }),
                _ => self.clone(),
            },

            A::WidgetClosed => match self.phase {
                P::AwaitingPayment { .. } => self.with_phase(P::Editing),
                _ => self.clone(),
            },

            A::Reset => Self::default(),
        }
    }

    /// The failure message to show, if the last attempt failed.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match &self.phase {
            CheckoutPhase::Failed { message } => Some(message),
            _ => None,
        }
    }

    fn edit(&self, mutate: impl FnOnce(&mut CheckoutForm)) -> Self {
        // Field edits are only meaningful while the customer can still
        // change the order; a failed attempt drops back to editing. An
        // edited form is a new order intent, so the idempotency key of the
        // previous attempt is dropped.
        match self.phase {
            CheckoutPhase::Editing | CheckoutPhase::Failed { .. } => {
                let mut form = self.form.clone();
                mutate(&mut form);
                Self {
                    form,
                    phase: CheckoutPhase::Editing,
                    submission_key: None,
                }
            }
            _ => self.clone(),
        }
    }

    fn with_phase(&self, phase: CheckoutPhase) -> Self {
        Self {
            form: self.form.clone(),
            phase,
            submission_key: self.submission_key,
        }
    }
}

/// Why a submission was rejected before any network call.
///
/// The display strings are the user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please accept the terms and conditions before placing your order")]
    TermsNotAccepted,
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("Credit terms must be between {MIN_TERM_MONTHS} and {MAX_TERM_MONTHS} months")]
    InvalidTermMonths(u32),
    #[error("{0} is required")]
    MissingBillingField(&'static str),
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

/// Check a form against the cart before submission.
///
/// Rules run in a fixed order and the first failure aborts; nothing is
/// sent to the order API unless every rule passes. Returns the parsed
/// buyer email on success.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate(form: &CheckoutForm, cart: &[CartLine]) -> Result<Email, ValidationError> {
    if !form.agreed_to_terms {
        return Err(ValidationError::TermsNotAccepted);
    }

    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    if form.payment_type == PaymentType::Credit
        && !(MIN_TERM_MONTHS..=MAX_TERM_MONTHS).contains(&form.term_months)
    {
        return Err(ValidationError::InvalidTermMonths(form.term_months));
    }

    for (label, value) in [
        ("Full name", &form.billing.full_name),
        ("Address", &form.billing.line1),
        ("City", &form.billing.city),
        ("Postal code", &form.billing.postal_code),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingBillingField(label));
        }
    }

    Email::parse(form.email.trim()).map_err(|_| ValidationError::InvalidEmail)
}
