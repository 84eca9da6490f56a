//! Product browsing route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::types::Product;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            slug: product.slug.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image: product.image.clone(),
            in_stock: product.in_stock,
        }
    }
}

/// Collection display data for templates.
#[derive(Clone)]
pub struct CollectionView {
    pub slug: String,
    pub name: String,
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub page: Option<u32>,
    pub collection: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub collections: Vec<CollectionView>,
    pub selected_collection: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_more_pages: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
}

/// Display product listing page.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse> {
    let current_page = query.page.unwrap_or(1).max(1);

    let page = state
        .catalog()
        .list_products(query.collection.as_deref(), current_page)
        .await?;
    let collections = state.catalog().list_collections().await?;

    Ok(ProductsIndexTemplate {
        products: page.products.iter().map(ProductView::from).collect(),
        collections: collections
            .iter()
            .map(|c| CollectionView {
                slug: c.slug.clone(),
                name: c.name.clone(),
            })
            .collect(),
        selected_collection: query.collection,
        current_page,
        total_pages: page.total_pages,
        has_more_pages: current_page < page.total_pages,
    })
}

/// Display product detail page.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state.catalog().get_product(&slug).await?;

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
    })
}
