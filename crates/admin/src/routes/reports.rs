//! Sales report route handler.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

use super::dashboard::AdminUserView;
use super::render;

/// Default report window when no range is given.
const DEFAULT_WINDOW_DAYS: u64 = 30;

/// Query parameters for the sales report.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Daily row view for templates.
#[derive(Debug, Clone)]
pub struct DailySalesView {
    pub date: String,
    pub orders: u64,
    pub revenue: Decimal,
}

/// Top product row view for templates.
#[derive(Debug, Clone)]
pub struct TopProductView {
    pub name: String,
    pub units: u64,
    pub revenue: Decimal,
}

/// Sales report page template.
#[derive(Template)]
#[template(path = "reports/index.html")]
pub struct ReportsTemplate {
    pub admin_user: AdminUserView,
    pub from: String,
    pub to: String,
    pub total_orders: u64,
    pub total_revenue: Decimal,
    pub days: Vec<DailySalesView>,
    pub top_products: Vec<TopProductView>,
}

/// Sales report page handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let to = query.to.unwrap_or(today);
    let from = query
        .from
        .unwrap_or_else(|| to.checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS)).unwrap_or(to));

    let report = state.api().sales_report(from, to).await?;

    render(&ReportsTemplate {
        admin_user: AdminUserView::from(&admin),
        from: report.from.to_string(),
        to: report.to.to_string(),
        total_orders: report.total_orders,
        total_revenue: report.total_revenue,
        days: report
            .days
            .iter()
            .map(|day| DailySalesView {
                date: day.date.to_string(),
                orders: day.orders,
                revenue: day.revenue,
            })
            .collect(),
        top_products: report
            .top_products
            .iter()
            .map(|product| TopProductView {
                name: product.name.clone(),
                units: product.units,
                revenue: product.revenue,
            })
            .collect(),
    })
}
