//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::products::{CollectionView, ProductView};

/// Number of products featured on the home page.
const FEATURED_COUNT: usize = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home/index.html")]
pub struct HomeTemplate {
    pub featured: Vec<ProductView>,
    pub collections: Vec<CollectionView>,
}

/// Display the home page.
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let page = state.catalog().list_products(None, 1).await?;
    let collections = state.catalog().list_collections().await?;

    Ok(HomeTemplate {
        featured: page
            .products
            .iter()
            .take(FEATURED_COUNT)
            .map(ProductView::from)
            .collect(),
        collections: collections
            .iter()
            .map(|c| CollectionView {
                slug: c.slug.clone(),
                name: c.name.clone(),
            })
            .collect(),
    })
}
