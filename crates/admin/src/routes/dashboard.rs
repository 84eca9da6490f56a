//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use heartwood_core::UserRole;

use crate::api::is_low_stock;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::state::AppState;

use super::render;

/// Number of recent orders shown on the dashboard.
const RECENT_ORDER_COUNT: usize = 5;

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.clone(),
            is_admin: admin.role == UserRole::Admin,
        }
    }
}

/// Recent order view for the dashboard.
#[derive(Debug, Clone)]
pub struct RecentOrderView {
    pub id: String,
    pub customer_email: String,
    pub status: String,
    pub total: rust_decimal::Decimal,
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub open_orders: u64,
    pub low_stock_count: usize,
    pub recent_orders: Vec<RecentOrderView>,
}

/// Dashboard page handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let orders = state.api().list_orders(None, 1).await?;
    let inventory = state.api().list_inventory().await?;

    let template = DashboardTemplate {
        admin_user: AdminUserView::from(&admin),
        open_orders: orders.total,
        low_stock_count: inventory.iter().filter(|item| is_low_stock(item)).count(),
        recent_orders: orders
            .orders
            .iter()
            .take(RECENT_ORDER_COUNT)
            .map(|order| RecentOrderView {
                id: order.id.to_string(),
                customer_email: order.customer_email.clone(),
                status: order.status.to_string(),
                total: order.total,
            })
            .collect(),
    };

    render(&template)
}
