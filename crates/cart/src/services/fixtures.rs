//! Fixture-backed stock and catalog.
//!
//! Reads the same document shape a mock REST server would serve:
//!
//! ```json
//! {
//!   "products": [{ "id": 1, "title": "...", "price": 179.9, "image": "..." }],
//!   "stock": [{ "id": 1, "amount": 3 }]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use rocketshoes_core::{ProductDetails, ProductId, StockSnapshot};
use serde::Deserialize;

use super::{CatalogService, ServiceError, StockService};

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    products: Vec<ProductDetails>,
    #[serde(default)]
    stock: Vec<StockSnapshot>,
}

#[derive(Debug, Default)]
struct FixtureData {
    products: HashMap<ProductId, ProductDetails>,
    stock: HashMap<ProductId, i64>,
}

/// Products and stock held in memory.
///
/// Clones share state, so stock adjusted through one handle is visible to
/// every engine holding another.
#[derive(Debug, Clone, Default)]
pub struct FixtureInventory {
    inner: Arc<RwLock<FixtureData>>,
}

impl FixtureInventory {
    /// Create an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an inventory from a fixture document.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Fixture`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, ServiceError> {
        let file: FixtureFile =
            serde_json::from_str(json).map_err(|e| ServiceError::Fixture(e.to_string()))?;

        let data = FixtureData {
            products: file.products.into_iter().map(|p| (p.id, p)).collect(),
            stock: file.stock.into_iter().map(|s| (s.id, s.amount)).collect(),
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(data)),
        })
    }

    /// Read an inventory from a fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Fixture`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Fixture(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Add a product with the given stock.
    #[must_use]
    pub fn with_product(self, product: ProductDetails, stock: i64) -> Self {
        {
            let mut data = self.write();
            data.stock.insert(product.id, stock);
            data.products.insert(product.id, product);
        }
        self
    }

    /// Change the available stock of a product.
    pub fn set_stock(&self, product_id: ProductId, amount: i64) {
        self.write().stock.insert(product_id, amount);
    }

    // Every mutation is a single map insert, so a poisoned lock still guards
    // consistent data.
    fn read(&self) -> RwLockReadGuard<'_, FixtureData> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FixtureData> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StockService for FixtureInventory {
    async fn stock(&self, product_id: ProductId) -> Result<StockSnapshot, ServiceError> {
        let amount = self.read().stock.get(&product_id).copied();
        amount
            .map(|amount| StockSnapshot::new(product_id, amount))
            .ok_or_else(|| ServiceError::NotFound(format!("stock/{product_id}")))
    }
}

#[async_trait]
impl CatalogService for FixtureInventory {
    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, ServiceError> {
        let product = self.read().products.get(&product_id).cloned();
        product.ok_or_else(|| ServiceError::NotFound(format!("products/{product_id}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::Price;

    use super::*;

    const FIXTURE: &str = r#"{
        "products": [
            { "id": 1, "title": "Tênis de Caminhada Leve Confortável", "price": 179.9, "image": "https://example.com/1.jpg" },
            { "id": 2, "title": "Tênis VR Caminhada Confortável", "price": 139.9, "image": "https://example.com/2.jpg" }
        ],
        "stock": [
            { "id": 1, "amount": 3 },
            { "id": 2, "amount": 0 }
        ]
    }"#;

    #[tokio::test]
    async fn test_from_json() {
        let inventory = FixtureInventory::from_json(FIXTURE).unwrap();

        let stock = inventory.stock(ProductId::new(1)).await.unwrap();
        assert_eq!(stock.amount, 3);

        let product = inventory.product(ProductId::new(2)).await.unwrap();
        assert_eq!(product.price, Price::from_cents(13990));

        assert!(matches!(
            inventory.product(ProductId::new(3)).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_set_stock_is_shared_between_clones() {
        let inventory = FixtureInventory::from_json(FIXTURE).unwrap();
        let handle = inventory.clone();

        handle.set_stock(ProductId::new(2), 5);
        assert_eq!(inventory.stock(ProductId::new(2)).await.unwrap().amount, 5);
    }

    #[test]
    fn test_malformed_fixture() {
        assert!(matches!(
            FixtureInventory::from_json("{\"products\": 1}"),
            Err(ServiceError::Fixture(_))
        ));
        assert!(matches!(
            FixtureInventory::from_path("/nonexistent/fixture.json"),
            Err(ServiceError::Fixture(_))
        ));
    }

    #[tokio::test]
    async fn test_poisoned_lock_keeps_serving() {
        let inventory = FixtureInventory::from_json(FIXTURE).unwrap();
        let handle = inventory.clone();
        let _ = std::thread::spawn(move || {
            let _guard = handle.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(inventory.inner.is_poisoned());

        inventory.set_stock(ProductId::new(1), 9);
        let inventory = inventory.with_product(
            ProductDetails {
                id: ProductId::new(3),
                title: "Trail".to_string(),
                price: Price::from_cents(100),
                image: String::new(),
            },
            2,
        );

        assert_eq!(inventory.stock(ProductId::new(1)).await.unwrap().amount, 9);
        assert_eq!(inventory.stock(ProductId::new(3)).await.unwrap().amount, 2);
        assert_eq!(inventory.product(ProductId::new(3)).await.unwrap().title, "Trail");
    }
}
