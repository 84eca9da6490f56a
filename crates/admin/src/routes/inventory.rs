//! Inventory management route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::api::is_low_stock;
use crate::api::types::{InventoryItem, StockAdjustment, StockSet};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

use super::dashboard::AdminUserView;
use super::render;

/// Query parameters for the inventory page.
#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub low_stock_only: Option<bool>,
}

/// Form input for a relative stock adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustForm {
    pub product_id: i64,
    pub delta: i64,
    pub reason: Option<String>,
}

/// Form input for an absolute stock level.
#[derive(Debug, Deserialize)]
pub struct SetForm {
    pub product_id: i64,
    pub quantity: i64,
    pub reason: Option<String>,
}

/// Inventory row view for templates.
#[derive(Debug, Clone)]
pub struct InventoryItemView {
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
    pub is_low_stock: bool,
}

impl From<&InventoryItem> for InventoryItemView {
    fn from(item: &InventoryItem) -> Self {
        Self {
            product_id: item.product_id.as_i64(),
            sku: item.sku.clone(),
            name: item.name.clone(),
            price: item.price,
            stock: item.stock,
            is_low_stock: is_low_stock(item),
        }
    }
}

/// Inventory index page template.
#[derive(Template)]
#[template(path = "inventory/index.html")]
pub struct InventoryIndexTemplate {
    pub admin_user: AdminUserView,
    pub items: Vec<InventoryItemView>,
    pub low_stock_only: bool,
    pub low_stock_count: usize,
}

/// Inventory index page handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Result<impl IntoResponse> {
    let inventory = state.api().list_inventory().await?;
    let low_stock_only = query.low_stock_only.unwrap_or(false);

    let low_stock_count = inventory.iter().filter(|item| is_low_stock(item)).count();
    let items: Vec<InventoryItemView> = inventory
        .iter()
        .filter(|item| !low_stock_only || is_low_stock(item))
        .map(InventoryItemView::from)
        .collect();

    render(&InventoryIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        items,
        low_stock_only,
        low_stock_count,
    })
}

/// Apply a relative stock adjustment.
#[instrument(skip(admin, state))]
pub async fn adjust(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<AdjustForm>,
) -> Result<Response> {
    let adjustment = StockAdjustment {
        product_id: form.product_id.into(),
        delta: form.delta,
        reason: form.reason.filter(|reason| !reason.trim().is_empty()),
    };

    let updated = state.api().adjust_stock(&adjustment).await?;
    tracing::info!(
        admin = %admin.email,
        product_id = %updated.product_id,
        stock = updated.stock,
        "Stock adjusted"
    );

    Ok(Redirect::to("/inventory").into_response())
}

/// Set an absolute stock level.
#[instrument(skip(admin, state))]
pub async fn set(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<SetForm>,
) -> Result<Response> {
    let set = StockSet {
        product_id: form.product_id.into(),
        quantity: form.quantity,
        reason: form.reason.filter(|reason| !reason.trim().is_empty()),
    };

    let updated = state.api().set_stock(&set).await?;
    tracing::info!(
        admin = %admin.email,
        product_id = %updated.product_id,
        stock = updated.stock,
        "Stock level set"
    );

    Ok(Redirect::to("/inventory").into_response())
}
