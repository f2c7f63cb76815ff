//! Persistent cart storage.
//!
//! # Layers
//!
//! - [`KeyValueStore`] - durable string storage, one value per key
//!   - [`MemoryStore`] - process-local, for embedding and tests
//!   - [`FileStore`] - one JSON file per key, replaced atomically
//! - [`CartStorage`] - scopes a store to the single cart key and handles
//!   (de)serialization
//!
//! A stored value that is missing, unreadable or fails to deserialize into a
//! valid [`Cart`] loads as an empty cart. Corruption is logged, never fatal.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use rocketshoes_core::Cart;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur when reading or writing the store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cart could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A writer panicked while holding the store lock.
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Durable key-value storage.
///
/// `set` must replace the whole value atomically from the caller's
/// perspective: a reader sees either the old or the new value, never a mix.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Cart persistence scoped to one storage key.
#[derive(Clone)]
pub struct CartStorage {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CartStorage {
    /// Key used when none is configured.
    pub const DEFAULT_KEY: &'static str = "@RocketShoes:cart";

    /// Create cart storage over `store` under `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored cart, or an empty cart if there is no valid value.
    #[must_use]
    pub fn load(&self) -> Cart {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read stored cart, starting empty");
                return Cart::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key = %self.key, error = %e, "Stored cart is corrupt, starting empty");
            Cart::new()
        })
    }

    /// Overwrite the stored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails. The
    /// previously stored value is left in place.
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart)?;
        self.store.set(&self.key, &raw)
    }

    /// The raw stored value, exactly as written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    pub fn raw(&self) -> Result<Option<String>, StorageError> {
        self.store.get(&self.key)
    }
}

impl std::fmt::Debug for CartStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStorage")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
