//! Shopping cart state.
//!
//! The cart is the one piece of state this client owns: everything else is
//! fetched from the Heartwood API on demand. [`CartStore`] holds the line
//! items in memory and writes the full collection through a [`CartStorage`]
//! implementation after every mutation. The session-backed storage is a
//! convenience cache, not a system of record: persistence failures are
//! logged and swallowed, and the in-memory state stays authoritative for
//! the rest of the session.

pub mod storage;

pub use storage::{CartStorage, MemoryCartStorage, SessionCartStorage};

use heartwood_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product's presence in the cart.
///
/// The cart holds at most one line per product; adding the same product
/// again increases the quantity of the existing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    /// Line total: `quantity * unit_price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Single source of truth for cart contents.
///
/// Prices and names on the lines are taken from the caller as-is; the
/// order API re-prices every line at submission, so the store performs no
/// validation of its own.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    lines: Vec<CartLine>,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Rehydrate a cart from storage.
    ///
    /// Missing or unreadable stored state yields an empty cart.
    pub async fn open(storage: S) -> Self {
        let lines = storage.load().await;
        Self { lines, storage }
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of items across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Cart total, recomputed from the current lines on every read.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add a line to the cart.
    ///
    /// If a line with the same product already exists, its quantity grows
    /// by the added quantity; otherwise the line is appended.
    pub async fn add_item(&mut self, line: CartLine) {
        match self
            .lines
            .iter_mut()
            .find(|existing| existing.product_id == line.product_id)
        {
            Some(existing) => existing.quantity += line.quantity,
            None => self.lines.push(line),
        }
        self.persist().await;
    }

    /// Remove the line for a product. No-op if the product is not in the cart.
    pub async fn remove_item(&mut self, product_id: ProductId) {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        if self.lines.len() != before {
            self.persist().await;
        }
    }

    /// Set a line's quantity exactly (not additive).
    ///
    /// A quantity of zero or less removes the line. No-op if the product is
    /// not in the cart.
    pub async fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id).await;
            return;
        }

        let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        else {
            return;
        };

        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.persist().await;
    }

    /// Empty the cart.
    pub async fn clear(&mut self) {
        self.lines.clear();
        self.persist().await;
    }

    async fn persist(&self) {
        self.storage.save(&self.lines).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i64, quantity: u32, price: i64) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: Decimal::new(price, 0),
            image: None,
            quantity,
        }
    }

    async fn empty_cart() -> CartStore<MemoryCartStorage> {
        CartStore::open(MemoryCartStorage::default()).await
    }

    #[tokio::test]
    async fn test_add_item_merges_by_product_id() {
        let mut cart = empty_cart().await;
        cart.add_item(line(1, 2, 10)).await;
        cart.add_item(line(1, 3, 10)).await;

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
        assert_eq!(cart.total(), Decimal::new(50, 0));
    }

    #[tokio::test]
    async fn test_add_item_appends_new_products() {
        let mut cart = empty_cart().await;
        cart.add_item(line(1, 1, 10)).await;
        cart.add_item(line(2, 1, 25)).await;

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[tokio::test]
    async fn test_update_quantity_sets_exactly() {
        let mut cart = empty_cart().await;
        cart.add_item(line(1, 2, 10)).await;
        cart.update_quantity(ProductId::new(1), 7).await;

        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[tokio::test]
    async fn test_update_quantity_zero_removes_line() {
        let mut cart = empty_cart().await;
        cart.add_item(line(1, 1, 10)).await;
        cart.update_quantity(ProductId::new(1), 0).await;

        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_update_quantity_negative_removes_line() {
        let mut cart = empty_cart().await;
        cart.add_item(line(1, 3, 10)).await;
        cart.update_quantity(ProductId::new(1), -4).await;

        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_update_quantity_unknown_product_is_noop() {
        let mut cart = empty_cart().await;
        cart.add_item(line(1, 1, 10)).await;
        cart.update_quantity(ProductId::new(99), 5).await;

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_remove_item_unknown_product_is_noop() {
        let mut cart = empty_cart().await;
        cart.add_item(line(1, 1, 10)).await;
        cart.remove_item(ProductId::new(99)).await;

        assert_eq!(cart.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_total_recomputed_after_every_mutation() {
        let mut cart = empty_cart().await;
        cart.add_item(line(1, 2, 10)).await;
        cart.add_item(line(2, 1, 25)).await;
        assert_eq!(cart.total(), Decimal::new(45, 0));

        cart.update_quantity(ProductId::new(1), 1).await;
        assert_eq!(cart.total(), Decimal::new(35, 0));

        cart.remove_item(ProductId::new(2)).await;
        assert_eq!(cart.total(), Decimal::new(10, 0));
    }

    #[tokio::test]
    async fn test_clear_empties_cart() {
        let mut cart = empty_cart().await;
        cart.add_item(line(1, 2, 10)).await;
        cart.clear().await;

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
