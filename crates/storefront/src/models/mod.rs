//! Storefront view-model and session types.

pub mod session;

pub use session::session_keys;
