//! Order management route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use heartwood_core::{OrderId, OrderStatus, PaymentType};

use crate::api::types::{OrderDetail, OrderSummary};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

use super::dashboard::AdminUserView;
use super::render;

/// All statuses, in lifecycle order, for the filter and the status form.
const STATUSES: [OrderStatus; 6] = [
    OrderStatus::Pending,
    OrderStatus::Paid,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
];

/// Query parameters for the order listing.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
}

/// Form input for a status change.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Order row view for templates.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: String,
    pub placed_at: String,
    pub customer_email: String,
    pub status: String,
    pub payment_label: &'static str,
    pub total: Decimal,
}

impl From<&OrderSummary> for OrderRowView {
    fn from(order: &OrderSummary) -> Self {
        Self {
            id: order.id.to_string(),
            placed_at: order.placed_at.format("%Y-%m-%d %H:%M").to_string(),
            customer_email: order.customer_email.clone(),
            status: order.status.to_string(),
            payment_label: payment_label(order.payment_type),
            total: order.total,
        }
    }
}

/// Full order view for the detail page.
#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub id: String,
    pub placed_at: String,
    pub customer_email: String,
    pub status: String,
    pub delivery_label: &'static str,
    pub payment_label: &'static str,
    pub term_months: u32,
    pub monthly_payment: Decimal,
    pub is_credit: bool,
    pub billing: Vec<String>,
    pub lines: Vec<OrderLineView>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Order line view for the detail page.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

const fn payment_label(payment_type: PaymentType) -> &'static str {
    match payment_type {
        PaymentType::Full => "Paid in full",
        PaymentType::Credit => "Installment credit",
    }
}

impl From<&OrderDetail> for OrderDetailView {
    fn from(order: &OrderDetail) -> Self {
        let billing = &order.billing_address;
        let mut billing_lines = vec![billing.full_name.clone(), billing.line1.clone()];
        if let Some(line2) = &billing.line2 {
            billing_lines.push(line2.clone());
        }
        billing_lines.push(format!("{}, {}", billing.city, billing.postal_code));

        Self {
            id: order.id.to_string(),
            placed_at: order.placed_at.format("%d %B %Y, %H:%M").to_string(),
            customer_email: order.customer_email.clone(),
            status: order.status.to_string(),
            delivery_label: order.delivery_option.label(),
            payment_label: payment_label(order.payment_type),
            term_months: order.term_months.unwrap_or(0),
            monthly_payment: order.monthly_payment.unwrap_or(Decimal::ZERO),
            is_credit: order.payment_type == PaymentType::Credit,
            billing: billing_lines,
            lines: order
                .lines
                .iter()
                .map(|line| OrderLineView {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    line_total: line.unit_price * Decimal::from(line.quantity),
                })
                .collect(),
            subtotal: order.subtotal,
            delivery_fee: order.delivery_fee,
            tax: order.tax,
            total: order.total,
        }
    }
}

/// Order listing page template.
#[derive(Template)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub admin_user: AdminUserView,
    pub orders: Vec<OrderRowView>,
    pub statuses: Vec<String>,
    pub selected_status: String,
    pub current_page: u32,
    pub total_pages: u32,
}

/// Order detail page template.
#[derive(Template)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub admin_user: AdminUserView,
    pub order: OrderDetailView,
    pub statuses: Vec<String>,
}

/// Order listing page handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<impl IntoResponse> {
    let status = query
        .status
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let page = query.page.unwrap_or(1).max(1);
    let orders = state.api().list_orders(status, page).await?;

    render(&OrdersIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        orders: orders.orders.iter().map(OrderRowView::from).collect(),
        statuses: STATUSES.iter().map(ToString::to_string).collect(),
        selected_status: status.map(|s| s.to_string()).unwrap_or_default(),
        current_page: orders.page,
        total_pages: orders.total_pages,
    })
}

/// Order detail page handler.
#[instrument(skip(admin, state))]
pub async fn show(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let order = state.api().get_order(OrderId::new(id)).await?;

    render(&OrderShowTemplate {
        admin_user: AdminUserView::from(&admin),
        order: OrderDetailView::from(&order),
        statuses: STATUSES.iter().map(ToString::to_string).collect(),
    })
}

/// Move an order to a new status.
#[instrument(skip(admin, state))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let status = form
        .status
        .parse::<OrderStatus>()
        .map_err(AppError::BadRequest)?;

    let order = state
        .api()
        .update_order_status(OrderId::new(id), status)
        .await?;
    tracing::info!(
        admin = %admin.email,
        order_id = %order.id,
        status = %order.status,
        "Order status updated"
    );

    Ok(Redirect::to(&format!("/orders/{id}")).into_response())
}
