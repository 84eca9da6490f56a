//! Wire types for the storefront surface of the Heartwood API.

use chrono::{DateTime, Utc};
use heartwood_core::{BillingAddress, DeliveryOption, OrderId, OrderStatus, PaymentType, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product as served by the catalog API.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub in_stock: bool,
    pub collection: Option<String>,
}

/// One page of the product listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: u32,
    pub total_pages: u32,
}

/// A named grouping of products (e.g. "Living room", "Outdoor").
#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    pub slug: String,
    pub name: String,
}

/// One line of an order request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLineInput {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// The full order submission payload.
///
/// `payment_type` is an integer discriminant on the wire and
/// `term_months` is absent for full payment. The idempotency key makes a
/// re-submission after a failed confirmation safe: the API returns the
/// already-created order instead of creating a second one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    pub idempotency_key: Uuid,
    pub lines: Vec<OrderLineInput>,
    pub delivery_option: DeliveryOption,
    pub payment_type: PaymentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
    pub billing_address: BillingAddress,
    pub email: String,
}

/// The API's answer to an accepted order.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedOrder {
    pub order_id: OrderId,
}

/// Payment confirmation payload, sent after the gateway reports success.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentConfirmation {
    pub transaction_ref: String,
}

/// A placed order, as served by the order-tracking endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
    pub delivery_option: DeliveryOption,
    pub payment_type: PaymentType,
    pub term_months: Option<u32>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub monthly_payment: Option<Decimal>,
}

/// One line of a placed order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_request_wire_shape() {
        let request = OrderRequest {
            idempotency_key: Uuid::nil(),
            lines: vec![OrderLineInput {
                product_id: ProductId::new(7),
                quantity: 2,
                unit_price: Decimal::new(45000, 2),
            }],
            delivery_option: DeliveryOption::Express,
            payment_type: PaymentType::Credit,
            term_months: Some(6),
            billing_address: BillingAddress {
                full_name: "N. Mokoena".to_string(),
                line1: "12 Baobab Street".to_string(),
                line2: None,
                city: "Pretoria".to_string(),
                postal_code: "0181".to_string(),
            },
            email: "buyer@example.com".to_string(),
        };

        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["payment_type"], 1);
        assert_eq!(json["term_months"], 6);
        assert_eq!(json["delivery_option"], "express");
        assert_eq!(json["lines"][0]["quantity"], 2);
    }

    #[test]
    fn test_full_payment_omits_term_months() {
        let request = OrderRequest {
            idempotency_key: Uuid::nil(),
            lines: Vec::new(),
            delivery_option: DeliveryOption::Standard,
            payment_type: PaymentType::Full,
            term_months: None,
            billing_address: BillingAddress::default(),
            email: String::new(),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("term_months"));
        assert!(json.contains("\"payment_type\":0"));
    }

    #[test]
    fn test_order_deserializes() {
        let order: Order = serde_json::from_str(
            r#"{
                "id": 1001,
                "status": "paid",
                "placed_at": "2026-02-11T09:30:00Z",
                "lines": [
                    {"product_id": 7, "name": "Riempie chair", "quantity": 2, "unit_price": "450.00"}
                ],
                "delivery_option": "standard",
                "payment_type": 0,
                "term_months": null,
                "subtotal": "900.00",
                "delivery_fee": "10.00",
                "tax": "135.00",
                "total": "1045.00",
                "monthly_payment": null
            }"#,
        )
        .unwrap();

        assert_eq!(order.id, OrderId::new(1001));
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.total, Decimal::new(104500, 2));
    }
}
