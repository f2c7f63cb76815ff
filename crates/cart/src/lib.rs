//! RocketShoes cart library.
//!
//! Client-side cart state for a single shopper session: the [`CartEngine`]
//! keeps the cart in memory, validates quantities against a stock service,
//! copies display attributes from a catalog service, and mirrors every
//! committed change into a persistent key-value store.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rocketshoes_cart::{CartEngine, Collaborators};
//!
//! let api = Arc::new(ApiClient::new(&config.api)?);
//! let mut engine = CartEngine::create(Collaborators {
//!     stock: api.clone(),
//!     catalog: api,
//!     storage: CartStorage::new(Arc::new(FileStore::new(&config.storage.dir)), &config.storage.key),
//!     notifier: Arc::new(TracingNotifier),
//! });
//!
//! engine.add_product(ProductId::new(1)).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod engine;
pub mod error;
pub mod notify;
pub mod services;
pub mod storage;

pub use engine::{
    CartEngine, CartOperation, CartOutcome, Collaborators, SubscriptionId, UpdateProductAmount,
};
pub use error::CartFailure;
