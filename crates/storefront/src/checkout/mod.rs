//! Checkout: pricing, state machine, and submission flow.
//!
//! The checkout is the one multi-step interaction in the storefront. Its
//! state lives in the session between requests (the payment gateway
//! redirect would otherwise lose it) and every change to it goes through
//! the pure transition function in [`state`]. The [`flow`] module drives
//! the state machine against the order API; [`pricing`] holds the fee
//! table, tax, and credit amortization math.

pub mod flow;
pub mod pricing;
pub mod state;

pub use flow::{CheckoutApi, PaymentWidgetConfig, confirm_payment, submit};
pub use pricing::{Quote, monthly_payment};
pub use state::{
    CheckoutAction, CheckoutForm, CheckoutPhase, CheckoutState, MAX_TERM_MONTHS, MIN_TERM_MONTHS,
    ValidationError, validate,
};
