//! Cart state engine.
//!
//! [`CartEngine`] owns the authoritative in-memory cart and the handles to
//! its collaborators. Each mutation builds a candidate cart, writes it to
//! storage, and only then swaps it into memory, so memory and storage agree
//! after every committed change and neither moves on failure.
//!
//! Operations take `&mut self`: one operation runs to completion (commit or
//! reject) before the next can start. Suspension happens only while waiting
//! on the stock and catalog services.

mod observer;
mod outcome;

pub use observer::SubscriptionId;
pub use outcome::{CartOperation, CartOutcome, UpdateProductAmount};

use std::num::NonZeroU32;
use std::sync::Arc;

use rocketshoes_core::{Cart, CartSummary, LineItem, ProductId};
use tracing::{debug, info, instrument};

use crate::error::{CartFailure, add_breadcrumb};
use crate::notify::{Notification, Notifier};
use crate::services::{CatalogService, ServiceError, StockService};
use crate::storage::CartStorage;

use observer::Subscribers;

/// Everything the engine talks to.
pub struct Collaborators {
    pub stock: Arc<dyn StockService>,
    pub catalog: Arc<dyn CatalogService>,
    pub storage: CartStorage,
    pub notifier: Arc<dyn Notifier>,
}

/// The shopper's cart and its mutation protocol.
pub struct CartEngine {
    cart: Cart,
    stock: Arc<dyn StockService>,
    catalog: Arc<dyn CatalogService>,
    storage: CartStorage,
    notifier: Arc<dyn Notifier>,
    subscribers: Subscribers,
}

impl CartEngine {
    /// Create an engine, hydrating the cart from storage.
    ///
    /// A missing or corrupt stored value yields an empty cart.
    #[must_use]
    pub fn create(collaborators: Collaborators) -> Self {
        let Collaborators {
            stock,
            catalog,
            storage,
            notifier,
        } = collaborators;

        let cart = storage.load();
        debug!(key = %storage.key(), items = cart.len(), "Cart hydrated");

        Self {
            cart,
            stock,
            catalog,
            storage,
            notifier,
            subscribers: Subscribers::default(),
        }
    }

    /// Release the engine, dropping all subscriptions.
    ///
    /// Storage already holds the final state; the returned cart is a
    /// convenience copy of it.
    pub fn dispose(self) -> Cart {
        debug!(
            items = self.cart.len(),
            subscribers = self.subscribers.len(),
            "Cart engine disposed"
        );
        self.cart
    }

    /// Current line items.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Item count, quantity and subtotal of the current cart.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.cart.summary()
    }

    /// Register a callback run after every committed change.
    pub fn subscribe(&mut self, callback: impl Fn(&Cart) + Send + Sync + 'static) -> SubscriptionId {
        self.subscribers.add(Box::new(callback))
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart is incremented through
    /// [`update_product_amount`](Self::update_product_amount), so its stock
    /// check and failure messages apply.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> CartOutcome {
        if let Some(item) = self.cart.get(product_id) {
            let amount = i64::from(item.amount.get()) + 1;
            return self
                .update_product_amount(UpdateProductAmount { product_id, amount })
                .await;
        }

        match self.prepare_add(product_id).await {
            Ok(candidate) => self.commit(CartOperation::Add, product_id, candidate),
            Err(failure) => self.reject(CartOperation::Add, failure),
        }
    }

    /// Remove a product's line item.
    #[instrument(skip(self), fields(product_id = %product_id))]
    #[allow(clippy::unused_async)]
    pub async fn remove_product(&mut self, product_id: ProductId) -> CartOutcome {
        match self.cart.without(product_id) {
            Some(candidate) => self.commit(CartOperation::Remove, product_id, candidate),
            None => self.reject(CartOperation::Remove, CartFailure::NotInCart(product_id)),
        }
    }

    /// Set a line item's amount after checking stock.
    ///
    /// Amounts below one are ignored without notification.
    #[instrument(skip(self), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&mut self, request: UpdateProductAmount) -> CartOutcome {
        let UpdateProductAmount { product_id, amount } = request;

        if amount < 1 {
            debug!("Ignoring amount below one");
            return CartOutcome::Unchanged;
        }

        match self.prepare_update(product_id, amount).await {
            Ok(candidate) => self.commit(CartOperation::Update, product_id, candidate),
            Err(failure) => self.reject(CartOperation::Update, failure),
        }
    }

    // =========================================================================
    // Candidate construction
    // =========================================================================

    async fn prepare_add(&self, product_id: ProductId) -> Result<Cart, CartFailure> {
        let stock = self
            .stock
            .stock(product_id)
            .await
            .map_err(|e| CartFailure::service(product_id, e))?;

        if !stock.in_stock() {
            return Err(CartFailure::OutOfStock {
                product_id,
                requested: 1,
                available: stock.amount,
            });
        }

        let product = self
            .catalog
            .product(product_id)
            .await
            .map_err(|e| CartFailure::service(product_id, e))?;

        // The line is keyed by the catalog's id, which must be the one stock-checked
        if product.id != product_id {
            return Err(CartFailure::service(
                product_id,
                ServiceError::Parse(format!(
                    "catalog returned product {} for {product_id}",
                    product.id
                )),
            ));
        }

        Ok(self.cart.with_item(LineItem::new(product))?)
    }

    async fn prepare_update(&self, product_id: ProductId, amount: i64) -> Result<Cart, CartFailure> {
        let stock = self
            .stock
            .stock(product_id)
            .await
            .map_err(|e| CartFailure::service(product_id, e))?;

        if !self.cart.contains(product_id) {
            return Err(CartFailure::NotInCart(product_id));
        }

        if !stock.covers(amount) {
            return Err(CartFailure::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let amount = u32::try_from(amount)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(CartFailure::AmountOutOfRange {
                product_id,
                requested: amount,
            })?;

        self.cart
            .with_amount(product_id, amount)
            .ok_or(CartFailure::NotInCart(product_id))
    }

    // =========================================================================
    // Commit / reject
    // =========================================================================

    /// Persist `candidate`, then make it the current cart.
    fn commit(&mut self, operation: CartOperation, product_id: ProductId, candidate: Cart) -> CartOutcome {
        if let Err(e) = self.storage.save(&candidate) {
            return self.reject(operation, e.into());
        }

        self.cart = candidate;
        add_breadcrumb(operation, product_id);
        info!(
            operation = %operation,
            items = self.cart.len(),
            "Cart updated"
        );

        self.subscribers.publish(&self.cart);
        CartOutcome::Committed
    }

    /// Report `failure` once and leave the cart as it was.
    fn reject(&self, operation: CartOperation, failure: CartFailure) -> CartOutcome {
        failure.report(operation);
        self.notifier
            .notify(Notification::error(failure.user_message(operation)));
        CartOutcome::Rejected(failure)
    }
}

impl std::fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEngine")
            .field("cart", &self.cart)
            .field("storage", &self.storage)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
