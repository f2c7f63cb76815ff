//! Cart failure reporting with Sentry integration.
//!
//! Every rejected cart operation carries a [`CartFailure`]. Expected
//! conditions (out of stock, product not in cart) are logged at `warn`;
//! collaborator failures are captured to Sentry before being logged, the
//! same way server errors are treated in request handlers.

use rocketshoes_core::{CartError, ProductId};
use thiserror::Error;

use crate::engine::CartOperation;
use crate::notify::messages;
use crate::services::ServiceError;
use crate::storage::StorageError;

/// Why a cart operation was rejected.
#[derive(Debug, Error)]
pub enum CartFailure {
    /// Requested amount exceeds available stock.
    #[error("product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The product has no line item in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Stock or catalog lookup failed.
    #[error("product {product_id}: {source}")]
    Service {
        product_id: ProductId,
        #[source]
        source: ServiceError,
    },

    /// Persisting the cart failed.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// The candidate cart would break a cart invariant.
    #[error("invariant: {0}")]
    Invariant(#[from] CartError),

    /// The requested amount cannot be represented as a line item amount.
    #[error("product {product_id}: amount {requested} is out of range")]
    AmountOutOfRange { product_id: ProductId, requested: i64 },
}

impl CartFailure {
    /// Wrap a service error for `product_id`.
    #[must_use]
    pub const fn service(product_id: ProductId, source: ServiceError) -> Self {
        Self::Service { product_id, source }
    }

    /// Whether this is an expected shopper-facing condition rather than a
    /// collaborator fault.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::OutOfStock { .. } | Self::NotInCart(_))
    }

    /// Message shown to the shopper when `operation` fails this way.
    ///
    /// Out-of-stock has its own message; everything else collapses to the
    /// operation's generic failure message.
    #[must_use]
    pub const fn user_message(&self, operation: CartOperation) -> &'static str {
        match self {
            Self::OutOfStock { .. } => messages::OUT_OF_STOCK,
            _ => operation.failure_message(),
        }
    }

    /// Log the failure, capturing collaborator faults to Sentry.
    pub fn report(&self, operation: CartOperation) {
        if self.is_expected() {
            tracing::warn!(operation = %operation, reason = %self, "Cart operation rejected");
            return;
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            operation = %operation,
            error = %self,
            sentry_event_id = %event_id,
            "Cart operation failed"
        );
    }
}

/// Add a breadcrumb for a committed cart change.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// changes leading up to an error.
pub fn add_breadcrumb(operation: CartOperation, product_id: ProductId) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some("cart".to_string()),
        message: Some(operation.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };
    breadcrumb.data.insert(
        "product_id".to_string(),
        serde_json::Value::from(product_id.as_i32()),
    );

    sentry::add_breadcrumb(breadcrumb);
}
