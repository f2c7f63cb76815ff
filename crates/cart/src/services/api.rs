//! REST client for the stock and catalog API.
//!
//! # Endpoints
//!
//! - `GET {base}/stock/{id}` - `{ "id": 1, "amount": 3 }`
//! - `GET {base}/products/{id}` - `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`
//!
//! Catalog responses are cached (default 5 minute TTL). Stock responses are
//! never cached: every quantity check must see current inventory.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use rocketshoes_core::{ProductDetails, ProductId, StockSnapshot};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};
use url::Url;

use super::{CatalogService, ServiceError, StockService};
use crate::config::ApiConfig;

/// Client for the stock and catalog API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    catalog_cache: Cache<ProductId, ProductDetails>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ServiceError::Parse(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let catalog_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: with_trailing_slash(config.base_url.clone()),
                catalog_cache,
            }),
        })
    }

    /// Resolve an endpoint path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| ServiceError::Parse(format!("Invalid endpoint {path}: {e}")))
    }

    /// Execute a GET request and parse the JSON body.
    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let url = self.endpoint(path)?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Self::parse_error(path, response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ServiceError::Parse(format!("Failed to parse response from {path}: {e}"))
        })
    }

    /// Map a non-success response to an error.
    async fn parse_error(path: &str, response: reqwest::Response) -> ServiceError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(1);
            return ServiceError::RateLimited(retry_after);
        }

        if status == 404 {
            return ServiceError::NotFound(path.to_string());
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        ServiceError::Api {
            status,
            message: message.chars().take(200).collect(),
        }
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl StockService for ApiClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn stock(&self, product_id: ProductId) -> Result<StockSnapshot, ServiceError> {
        self.get(&format!("stock/{product_id}")).await
    }
}

#[async_trait]
impl CatalogService for ApiClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, ServiceError> {
        if let Some(product) = self.inner.catalog_cache.get(&product_id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: ProductDetails = self.get(&format!("products/{product_id}")).await?;

        self.inner
            .catalog_cache
            .insert(product_id, product.clone())
            .await;

        Ok(product)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}
