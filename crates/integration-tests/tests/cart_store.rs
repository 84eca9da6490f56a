//! Cart store behavior across mutations and simulated restarts.

#![allow(clippy::unwrap_used)]

use heartwood_core::ProductId;
use rust_decimal::Decimal;

use heartwood_integration_tests::line;
use heartwood_storefront::cart::{CartStore, MemoryCartStorage};

// =============================================================================
// Merge behavior
// =============================================================================

#[tokio::test]
async fn adding_the_same_product_merges_quantities() {
    let mut cart = CartStore::open(MemoryCartStorage::default()).await;

    cart.add_item(line(1, 2, 10)).await;
    cart.add_item(line(1, 3, 10)).await;

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 5);
    assert_eq!(cart.total(), Decimal::new(50, 0));
}

#[tokio::test]
async fn a_long_add_sequence_never_duplicates_products() {
    let mut cart = CartStore::open(MemoryCartStorage::default()).await;

    for round in 0..10 {
        cart.add_item(line(1, 1, 10)).await;
        cart.add_item(line(2, 2, 25)).await;
        cart.add_item(line(3, round + 1, 5)).await;
    }

    assert_eq!(cart.lines().len(), 3);
    assert_eq!(cart.lines()[0].quantity, 10);
    assert_eq!(cart.lines()[1].quantity, 20);
}

// =============================================================================
// Quantity floor
// =============================================================================

#[tokio::test]
async fn setting_quantity_to_zero_removes_the_line() {
    let mut cart = CartStore::open(MemoryCartStorage::default()).await;

    cart.add_item(line(1, 1, 10)).await;
    cart.update_quantity(ProductId::new(1), 0).await;

    assert!(cart.is_empty());
}

#[tokio::test]
async fn negative_quantities_behave_like_removal() {
    let mut cart = CartStore::open(MemoryCartStorage::default()).await;

    cart.add_item(line(1, 4, 10)).await;
    cart.update_quantity(ProductId::new(1), -1).await;

    assert!(cart.is_empty());
}

// =============================================================================
// Derived total
// =============================================================================

#[tokio::test]
async fn total_tracks_every_mutation() {
    let mut cart = CartStore::open(MemoryCartStorage::default()).await;

    cart.add_item(line(1, 2, 10)).await;
    cart.add_item(line(2, 1, 25)).await;
    assert_eq!(cart.total(), Decimal::new(45, 0));

    cart.update_quantity(ProductId::new(2), 3).await;
    assert_eq!(cart.total(), Decimal::new(95, 0));

    cart.remove_item(ProductId::new(1)).await;
    assert_eq!(cart.total(), Decimal::new(75, 0));

    cart.clear().await;
    assert_eq!(cart.total(), Decimal::ZERO);
}

// =============================================================================
// Persistence round trip
// =============================================================================

#[tokio::test]
async fn cart_survives_a_simulated_restart() {
    let storage = MemoryCartStorage::default();

    let mut cart = CartStore::open(storage.clone()).await;
    cart.add_item(line(1, 2, 10)).await;
    cart.add_item(line(2, 1, 25)).await;
    let saved = cart.lines().to_vec();
    drop(cart);

    let reopened = CartStore::open(storage).await;
    assert_eq!(reopened.lines(), saved.as_slice());
    assert_eq!(reopened.total(), Decimal::new(45, 0));
}

#[tokio::test]
async fn two_restarts_are_idempotent() {
    let storage = MemoryCartStorage::default();

    let mut cart = CartStore::open(storage.clone()).await;
    cart.add_item(line(7, 3, 450)).await;
    drop(cart);

    let first = CartStore::open(storage.clone()).await;
    let after_first = first.lines().to_vec();
    drop(first);

    let second = CartStore::open(storage).await;
    assert_eq!(second.lines(), after_first.as_slice());
}

#[tokio::test]
async fn corrupted_stored_state_yields_an_empty_cart() {
    let storage = MemoryCartStorage::with_raw("][ not even close to json");
    let cart = CartStore::open(storage).await;

    assert!(cart.is_empty());
    assert_eq!(cart.total(), Decimal::ZERO);
}

#[tokio::test]
async fn wrong_shape_stored_state_yields_an_empty_cart() {
    // Valid JSON, wrong schema.
    let storage = MemoryCartStorage::with_raw(r#"{"cart": "not a list"}"#);
    let cart = CartStore::open(storage).await;

    assert!(cart.is_empty());
}
