//! Session-related types for admin authentication.

use heartwood_core::{UserId, UserRole};
use serde::{Deserialize, Serialize};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
/// The API re-checks authorization on every call; this is a UX
/// convenience, not an enforcement boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

/// Session keys for admin authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
