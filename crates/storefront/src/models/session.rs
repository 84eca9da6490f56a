//! Session-stored state.
//!
//! The session is this client's durable storage: it carries the cart line
//! collection and the in-flight checkout snapshot between requests.

/// Session keys for stored state.
pub mod session_keys {
    /// Key for the full cart line collection.
    pub const CART: &str = "cart";

    /// Key for the checkout state snapshot (survives the payment redirect).
    pub const CHECKOUT: &str = "checkout";
}
