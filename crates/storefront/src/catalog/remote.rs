//! Demo product API client.
//!
//! Uses `reqwest` 0.13 for HTTP against a DummyJSON-compatible API and
//! caches responses using `moka` (TTL from configuration).

use std::sync::Arc;

use bouquet_core::ProductId;
use chrono::NaiveDate;
use moka::future::Cache;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use super::CatalogProduct;
use crate::config::RemoteCatalogConfig;

/// Errors that can occur when talking to the demo product API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The API answered with an unexpected status.
    #[error("Unexpected status {0}")]
    Status(u16),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

// =============================================================================
// API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ApiProduct {
    id: i64,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    price: f64,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    meta: Option<ApiMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeta {
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiProductList {
    products: Vec<ApiProduct>,
    total: u32,
    skip: u32,
    limit: u32,
}

/// One page of remote products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub products: Vec<CatalogProduct>,
    /// Total products available across all pages
    pub total: u32,
    pub skip: u32,
    pub limit: u32,
}

impl ProductPage {
    /// Whether more products follow this page.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.skip.saturating_add(self.limit) < self.total
    }
}

fn convert_product(api: ApiProduct) -> CatalogProduct {
    let price = Decimal::from_f64_retain(api.price)
        .map(|price| price.round_dp(2))
        .unwrap_or_else(|| {
            tracing::warn!(id = api.id, price = api.price, "Unrepresentable price, listing as 0");
            Decimal::ZERO
        });

    let added_on = api
        .meta
        .and_then(|meta| meta.created_at)
        .and_then(|created| created.get(..10).map(str::to_owned))
        .and_then(|date| NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok());

    CatalogProduct {
        id: ProductId::Numeric(api.id),
        // The demo API is English only
        name_ar: api.title.clone(),
        name_en: api.title,
        description: api.description,
        category: api.category,
        price,
        image: api.thumbnail,
        sizes: Vec::new(),
        colors: Vec::new(),
        added_on,
    }
}

fn convert_page(list: ApiProductList) -> ProductPage {
    ProductPage {
        products: list.products.into_iter().map(convert_product).collect(),
        total: list.total,
        skip: list.skip,
        limit: list.limit,
    }
}

// =============================================================================
// Cache Types
// =============================================================================

/// Cache key for products and pages.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(i64),
    Products { limit: u32, skip: u32 },
    Search(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<CatalogProduct>),
    Products(ProductPage),
}

// =============================================================================
// RemoteCatalogClient
// =============================================================================

/// Client for the demo product API.
///
/// Cheaply cloneable; clones share one HTTP client and cache.
#[derive(Clone)]
pub struct RemoteCatalogClient {
    inner: Arc<RemoteCatalogClientInner>,
}

struct RemoteCatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl RemoteCatalogClient {
    /// Create a new demo product API client.
    #[must_use]
    pub fn new(config: &RemoteCatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(RemoteCatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    /// Build `{base}/{path}?{query}`.
    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// GET `url` and parse the JSON body.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.path().to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Product API returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse product API response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, limit: u32, skip: u32) -> Result<ProductPage, CatalogError> {
        let cache_key = CacheKey::Products { limit, skip };

        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let url = self.url(
            "products",
            &[("limit", limit.to_string()), ("skip", skip.to_string())],
        )?;
        let page = convert_page(self.get(url).await?);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.clone()))
            .await;

        Ok(page)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn product(&self, id: i64) -> Result<CatalogProduct, CatalogError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.url(&format!("products/{id}"), &[])?;
        let product = convert_product(self.get(url).await.map_err(|e| match e {
            CatalogError::NotFound(_) => CatalogError::NotFound(format!("Product not found: {id}")),
            other => other,
        })?);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Search products by free text.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<ProductPage, CatalogError> {
        let query = query.trim().to_lowercase();
        let cache_key = CacheKey::Search(query.clone());

        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for search");
            return Ok(page);
        }

        let url = self.url("products/search", &[("q", query)])?;
        let page = convert_page(self.get(url).await?);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.clone()))
            .await;

        Ok(page)
    }
}
