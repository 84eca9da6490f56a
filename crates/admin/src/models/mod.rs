//! Admin view-model and session types.

pub mod session;

pub use session::{CurrentAdmin, session_keys};
