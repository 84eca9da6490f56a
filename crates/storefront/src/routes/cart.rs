//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session: every handler opens a
//! [`CartStore`] backed by session storage, mutates it, and lets the store
//! persist the result.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use heartwood_core::ProductId;
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{CartLine, CartStore, SessionCartStorage};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Open the session-backed cart for this request.
pub(crate) async fn open_cart(session: &Session) -> CartStore<SessionCartStorage> {
    CartStore::open(SessionCartStorage::new(session.clone())).await
}

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: i64,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub image: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            item_count: 0,
        }
    }

    /// Build the view from the live store.
    pub fn from_store<S: crate::cart::CartStorage>(cart: &CartStore<S>) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView {
                    product_id: line.product_id.as_i64(),
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    line_total: line.line_total(),
                    image: line.image.clone(),
                })
                .collect(),
            subtotal: cart.total(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub slug: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i64,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = open_cart(&session).await;
    CartShowTemplate {
        cart: CartView::from_store(&cart),
    }
}

/// Add item to cart (HTMX).
///
/// The line's name and price come from the catalog, not the form, so a
/// tampered form cannot change what the customer is quoted.
/// Returns an HTMX trigger to update the cart count badge.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state.catalog().get_product(&form.slug).await?;

    let mut cart = open_cart(&session).await;
    cart.add_item(CartLine {
        product_id: product.id,
        name: product.name,
        unit_price: product.price,
        image: product.image,
        quantity: form.quantity.unwrap_or(1).max(1),
    })
    .await;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
///
/// A quantity of zero removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let mut cart = open_cart(&session).await;
    cart.update_quantity(ProductId::new(form.product_id), form.quantity)
        .await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_store(&cart),
        },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let mut cart = open_cart(&session).await;
    cart.remove_item(ProductId::new(form.product_id)).await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_store(&cart),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = open_cart(&session).await;
    CartCountTemplate {
        count: cart.item_count(),
    }
}
