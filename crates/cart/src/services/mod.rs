//! Stock and catalog services.
//!
//! The engine consumes these through the [`StockService`] and
//! [`CatalogService`] traits:
//!
//! - [`ApiClient`] - REST client (`GET stock/{id}`, `GET products/{id}`), with
//!   catalog responses cached via `moka` and stock always fetched fresh
//! - [`FixtureInventory`] - products and stock from a JSON fixture, for
//!   offline use

mod api;
mod fixtures;

pub use api::ApiClient;
pub use fixtures::FixtureInventory;

use async_trait::async_trait;
use rocketshoes_core::{ProductDetails, ProductId, StockSnapshot};
use thiserror::Error;

/// Errors that can occur when querying stock or catalog data.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Fixture data could not be loaded.
    #[error("Fixture error: {0}")]
    Fixture(String),
}

/// Answers "how many units of this product are available right now".
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch a fresh stock snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is unknown or the lookup fails.
    async fn stock(&self, product_id: ProductId) -> Result<StockSnapshot, ServiceError>;
}

/// Answers "what does this product look like".
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch display attributes for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is unknown or the lookup fails.
    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, ServiceError>;
}
