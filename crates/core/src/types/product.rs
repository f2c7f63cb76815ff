//! Catalog and stock records returned by the product services.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Display attributes of a product, as reported by the catalog.
///
/// Carries no quantity: the cart owns the selected amount and the stock
/// service owns availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    /// Product ID.
    #[serde(alias = "productId")]
    pub id: ProductId,
    /// Product title.
    #[serde(alias = "name")]
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Product image URL.
    #[serde(alias = "imageUrl")]
    pub image: String,
}

/// Available inventory for one product at query time.
///
/// Never cached: every validation fetches a fresh snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSnapshot {
    /// Product ID.
    #[serde(alias = "productId")]
    pub id: ProductId,
    /// Units available. May be zero or negative when oversold.
    pub amount: i64,
}

impl StockSnapshot {
    /// Create a new stock snapshot.
    #[must_use]
    pub const fn new(id: ProductId, amount: i64) -> Self {
        Self { id, amount }
    }

    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.amount >= 1
    }

    /// Whether `requested` units can be satisfied.
    #[must_use]
    pub const fn covers(&self, requested: i64) -> bool {
        requested <= self.amount
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_details_accepts_alternate_field_names() {
        let json = r#"{
            "productId": 3,
            "name": "Tênis Adidas Duramo Lite 2.0",
            "price": 219.9,
            "imageUrl": "https://example.com/3.jpg"
        }"#;
        let details: ProductDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.id, ProductId::new(3));
        assert_eq!(details.title, "Tênis Adidas Duramo Lite 2.0");
        assert_eq!(details.price, Price::from_cents(21990));
    }

    #[test]
    fn test_stock_snapshot_checks() {
        let stock = StockSnapshot::new(ProductId::new(1), 2);
        assert!(stock.in_stock());
        assert!(stock.covers(2));
        assert!(!stock.covers(3));

        let empty: StockSnapshot = serde_json::from_str(r#"{"id": 1, "amount": 0}"#).unwrap();
        assert!(!empty.in_stock());
    }
}
