//! HTTP route handlers for the admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Dashboard
//! GET  /health                 - Health check
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! POST /auth/logout            - Logout action
//!
//! # Inventory
//! GET  /inventory              - Stock listing (low-stock filter)
//! POST /inventory/adjust       - Relative stock adjustment
//! POST /inventory/set          - Absolute stock level
//!
//! # Orders
//! GET  /orders                 - Order listing (status filter, paging)
//! GET  /orders/{id}            - Order detail
//! POST /orders/{id}/status     - Move order to a new status
//!
//! # Reports
//! GET  /reports                - Sales report over a date range
//!
//! # Users
//! GET  /users                  - User listing
//! POST /users/{id}/role        - Change a user's role
//!
//! # Audit
//! GET  /audit                  - Audit log (paged)
//! ```

pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod inventory;
pub mod orders;
pub mod reports;
pub mod users;

use askama::Template;
use axum::{
    Router,
    response::Html,
    routing::{get, post},
};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Render a template to an HTML response.
pub(crate) fn render<T: Template>(template: &T) -> Result<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template render failed: {e}")))
}

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/inventory", get(inventory::index))
        .route("/inventory/adjust", post(inventory::adjust))
        .route("/inventory/set", post(inventory::set))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", post(orders::update_status))
        .route("/reports", get(reports::index))
        .route("/users", get(users::index))
        .route("/users/{id}/role", post(users::update_role))
        .route("/audit", get(audit::index))
}
