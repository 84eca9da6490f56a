//! Wire types for the admin surface of the Heartwood API.

use chrono::{DateTime, NaiveDate, Utc};
use heartwood_core::{
    AuditEntryId, BillingAddress, DeliveryOption, OrderId, OrderStatus, PaymentType, ProductId,
    UserId, UserRole,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Login request sent to the admin API.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The identity returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminIdentity {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

/// One stock-keeping row of the inventory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryItem {
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
}

/// Relative stock adjustment.
#[derive(Debug, Serialize)]
pub struct StockAdjustment {
    pub product_id: ProductId,
    pub delta: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Absolute stock level set.
#[derive(Debug, Serialize)]
pub struct StockSet {
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// One row of the order listing.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub customer_email: String,
    pub status: OrderStatus,
    pub payment_type: PaymentType,
    pub total: Decimal,
}

/// One page of the order listing.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<OrderSummary>,
    pub page: u32,
    pub total_pages: u32,
    /// Total matching orders across all pages.
    pub total: u64,
}

/// A full order as the back office sees it.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetail {
    pub id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub customer_email: String,
    pub status: OrderStatus,
    pub delivery_option: DeliveryOption,
    pub payment_type: PaymentType,
    pub term_months: Option<u32>,
    pub monthly_payment: Option<Decimal>,
    pub billing_address: BillingAddress,
    pub lines: Vec<OrderDetailLine>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// One line of a full order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetailLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Order status change request.
#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Sales report over a date range.
#[derive(Debug, Clone, Deserialize)]
pub struct SalesReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_orders: u64,
    pub total_revenue: Decimal,
    pub days: Vec<DailySales>,
    pub top_products: Vec<TopProduct>,
}

/// One day of the sales report.
#[derive(Debug, Clone, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub orders: u64,
    pub revenue: Decimal,
}

/// One best-selling product of the sales report.
#[derive(Debug, Clone, Deserialize)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub units: u64,
    pub revenue: Decimal,
}

/// One row of the user listing.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// One page of the user listing.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPage {
    pub users: Vec<StoreUser>,
    pub page: u32,
    pub total_pages: u32,
}

/// User role change request.
#[derive(Debug, Serialize)]
pub struct RoleUpdate {
    pub role: UserRole,
}

/// One entry of the audit log.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub actor: String,
    pub action: String,
    pub entity: String,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One page of the audit log.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditPage {
    pub entries: Vec<AuditEntry>,
    pub page: u32,
    pub total_pages: u32,
}
