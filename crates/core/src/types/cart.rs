//! Cart and line item types.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s holding at most one entry
//! per product, each with an amount of at least one. Both rules are enforced
//! by construction: amounts are `NonZeroU32`, and every constructor and
//! transformation rejects duplicate products. Transformations never mutate in
//! place; they return the candidate cart so the caller can commit it.

use std::collections::HashSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Price, ProductDetails, ProductId};

/// Errors raised when cart invariants would be violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product already has a line item.
    #[error("product {0} appears more than once in the cart")]
    DuplicateProduct(ProductId),
}

/// One product and its selected quantity.
///
/// Serialized flat, with the catalog attributes alongside `amount`:
///
/// ```json
/// { "id": 1, "title": "...", "price": "179.9", "image": "...", "amount": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog attributes captured when the product was first added.
    #[serde(flatten)]
    pub product: ProductDetails,
    /// Selected quantity.
    pub amount: NonZeroU32,
}

impl LineItem {
    /// Create a line item with a quantity of one.
    #[must_use]
    pub const fn new(product: ProductDetails) -> Self {
        Self {
            product,
            amount: NonZeroU32::MIN,
        }
    }

    /// The product this line refers to.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times amount.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.amount.get())
    }
}

/// Derived totals for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Number of distinct products.
    pub distinct_items: usize,
    /// Sum of all amounts.
    pub total_quantity: u64,
    /// Sum of all line totals.
    pub subtotal: Price,
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line items, checking product uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::DuplicateProduct`] if two items share a product.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.product_id()) {
                return Err(CartError::DuplicateProduct(item.product_id()));
            }
        }
        Ok(Self { items })
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line item for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id() == product_id)
    }

    /// Whether the product has a line item.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// A copy of this cart with `item` appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::DuplicateProduct`] if the product is already present.
    pub fn with_item(&self, item: LineItem) -> Result<Self, CartError> {
        if self.contains(item.product_id()) {
            return Err(CartError::DuplicateProduct(item.product_id()));
        }
        let mut items = self.items.clone();
        items.push(item);
        Ok(Self { items })
    }

    /// A copy of this cart without the product, or `None` if it is absent.
    #[must_use]
    pub fn without(&self, product_id: ProductId) -> Option<Self> {
        if !self.contains(product_id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.product_id() != product_id)
            .cloned()
            .collect();
        Some(Self { items })
    }

    /// A copy of this cart with the product's amount replaced, or `None` if
    /// it is absent. All other fields of the line item are kept.
    #[must_use]
    pub fn with_amount(&self, product_id: ProductId, amount: NonZeroU32) -> Option<Self> {
        if !self.contains(product_id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.product_id() == product_id {
                    LineItem {
                        amount,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Some(Self { items })
    }

    /// Compute item count, quantity and subtotal.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            distinct_items: self.items.len(),
            total_quantity: self.items.iter().map(|i| u64::from(i.amount.get())).sum(),
            subtotal: self.items.iter().map(LineItem::line_total).sum(),
        }
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
