//! Integration tests for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - End-to-end engine behavior against fixture inventory
//! - `cart_properties` - Invariants over random operation sequences
//! - `cart_persistence` - File-backed storage across engine lifetimes
//!
//! Everything runs in-process: stock and catalog come from a
//! [`FixtureInventory`] and notifications are collected from a channel.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rocketshoes_cart::notify::{ChannelNotifier, Notification};
use rocketshoes_cart::services::FixtureInventory;
use rocketshoes_cart::storage::{CartStorage, KeyValueStore, MemoryStore, StorageError};
use rocketshoes_cart::{CartEngine, Collaborators};
use rocketshoes_core::{Cart, LineItem, Price, ProductDetails, ProductId};
use tokio::sync::mpsc::UnboundedReceiver;

/// Catalog entry for product `id` with a deterministic title and price.
#[must_use]
pub fn product(id: i32) -> ProductDetails {
    ProductDetails {
        id: ProductId::new(id),
        title: format!("Sneaker {id}"),
        price: Price::from_cents(9990 + i64::from(id) * 1000),
        image: format!("https://cdn.rocketshoes.test/{id}.jpg"),
    }
}

/// A memory store whose writes can be made to fail.
#[derive(Debug, Clone, Default)]
pub struct SwitchableStore {
    inner: MemoryStore,
    failing: Arc<AtomicBool>,
}

impl SwitchableStore {
    /// Make subsequent writes fail (or succeed again).
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl KeyValueStore for SwitchableStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }
}

/// Shared test setup: fixture inventory, switchable storage and a
/// notification channel.
pub struct TestContext {
    pub inventory: FixtureInventory,
    pub store: SwitchableStore,
    pub storage: CartStorage,
    notifier: ChannelNotifier,
    notifications: UnboundedReceiver<Notification>,
}

impl TestContext {
    /// Create a context with an empty inventory and empty storage.
    #[must_use]
    pub fn new() -> Self {
        let store = SwitchableStore::default();
        let storage = CartStorage::new(Arc::new(store.clone()), CartStorage::DEFAULT_KEY);
        let (notifier, notifications) = ChannelNotifier::channel();

        Self {
            inventory: FixtureInventory::new(),
            store,
            storage,
            notifier,
            notifications,
        }
    }

    /// Register [`product`] `id` with `stock` units available.
    #[must_use]
    pub fn with_product(mut self, id: i32, stock: i64) -> Self {
        self.inventory = self.inventory.with_product(product(id), stock);
        self
    }

    /// Persist a cart of `(product id, amount)` pairs before any engine exists.
    ///
    /// # Panics
    ///
    /// Panics if the pairs are not a valid cart or the store rejects the write.
    pub fn seed(&self, items: &[(i32, u32)]) {
        let items = items
            .iter()
            .map(|&(id, amount)| LineItem {
                product: product(id),
                amount: NonZeroU32::new(amount).expect("seed amounts start at 1"),
            })
            .collect();
        let cart = Cart::from_items(items).expect("seed ids are unique");
        self.storage.save(&cart).expect("seed write succeeds");
    }

    /// Create an engine wired to this context.
    #[must_use]
    pub fn engine(&self) -> CartEngine {
        CartEngine::create(Collaborators {
            stock: Arc::new(self.inventory.clone()),
            catalog: Arc::new(self.inventory.clone()),
            storage: self.storage.clone(),
            notifier: Arc::new(self.notifier.clone()),
        })
    }

    /// The stored cart value, exactly as written.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be read.
    #[must_use]
    pub fn raw_storage(&self) -> Option<String> {
        self.storage.raw().expect("memory store is readable")
    }

    /// Messages of all notifications received since the last call.
    pub fn take_notifications(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            messages.push(notification.message);
        }
        messages
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// `(product id, amount)` pairs of `cart`, in order.
#[must_use]
pub fn amounts(cart: &Cart) -> Vec<(i32, u32)> {
    cart.items()
        .iter()
        .map(|item| (item.product_id().as_i32(), item.amount.get()))
        .collect()
}
