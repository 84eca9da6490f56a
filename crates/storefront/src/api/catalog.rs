//! Catalog API client: collections and products.
//!
//! Read-only and safe to cache: responses are kept in a `moka` cache with
//! a 5-minute TTL so product browsing does not hammer the API.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::ApiConfig;

use super::types::{Collection, Product, ProductPage};
use super::{ApiError, read_json};

/// Cached catalog responses.
#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    ProductPage(Box<ProductPage>),
    Collections(Arc<Vec<Collection>>),
}

/// Client for the catalog surface of the Heartwood API.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    token: String,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                token: config.token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .get(format!("{}{path}", self.inner.base_url))
            .bearer_auth(&self.inner.token)
            .send()
            .await?;
        read_json(response).await
    }

    /// List all collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_collections(&self) -> Result<Arc<Vec<Collection>>, ApiError> {
        let cache_key = "collections".to_string();

        if let Some(CacheValue::Collections(collections)) =
            self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let collections: Arc<Vec<Collection>> = Arc::new(self.get("/api/v1/collections").await?);
        self.inner
            .cache
            .insert(cache_key, CacheValue::Collections(Arc::clone(&collections)))
            .await;

        Ok(collections)
    }

    /// List one page of products, optionally filtered by collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        collection: Option<&str>,
        page: u32,
    ) -> Result<ProductPage, ApiError> {
        let cache_key = format!("products:{}:{page}", collection.unwrap_or("*"));

        if let Some(CacheValue::ProductPage(cached)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product page");
            return Ok(*cached);
        }

        let path = match collection {
            Some(slug) => format!("/api/v1/products?collection={slug}&page={page}"),
            None => format!("/api/v1/products?page={page}"),
        };
        let products: ProductPage = self.get(&path).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::ProductPage(Box::new(products.clone())))
            .await;

        Ok(products)
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the product does not exist, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product(&self, slug: &str) -> Result<Product, ApiError> {
        let cache_key = format!("product:{slug}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .get(&format!("/api/v1/products/{slug}"))
            .await
            .map_err(|e| match e {
                ApiError::Server { status: 404, .. } => {
                    ApiError::NotFound(format!("Product not found: {slug}"))
                }
                other => other,
            })?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}
