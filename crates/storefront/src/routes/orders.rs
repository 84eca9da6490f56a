//! Order tracking route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use heartwood_core::{OrderId, PaymentType};

use crate::api::types::Order;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Order line display data for templates.
#[derive(Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Order display data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub status: String,
    pub placed_at: String,
    pub delivery_label: &'static str,
    pub is_credit: bool,
    pub term_months: u32,
    pub monthly_payment: Decimal,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub lines: Vec<OrderLineView>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            status: order.status.to_string(),
            placed_at: order.placed_at.format("%d %B %Y, %H:%M").to_string(),
            delivery_label: order.delivery_option.label(),
            is_credit: order.payment_type == PaymentType::Credit,
            term_months: order.term_months.unwrap_or(0),
            monthly_payment: order.monthly_payment.unwrap_or(Decimal::ZERO),
            subtotal: order.subtotal,
            delivery_fee: order.delivery_fee,
            tax: order.tax,
            total: order.total,
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
        }
    }
}

/// Order page query parameters.
#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    /// Set when arriving from a just-completed checkout.
    pub placed: Option<u8>,
}

/// Order tracking / confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub order: OrderView,
    pub just_placed: bool,
}

/// Display one order.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<OrderQuery>,
) -> Result<impl IntoResponse> {
    let order = state.checkout().get_order(OrderId::new(id)).await?;

    Ok(OrderShowTemplate {
        order: OrderView::from(&order),
        just_placed: query.placed.is_some(),
    })
}
