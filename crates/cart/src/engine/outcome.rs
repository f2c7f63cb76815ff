//! Operation inputs and results.

use core::fmt;

use rocketshoes_core::ProductId;

use crate::error::CartFailure;
use crate::notify::messages;

/// The three cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    Add,
    Remove,
    Update,
}

impl CartOperation {
    /// Generic message shown when this operation fails.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => messages::ADD_FAILED,
            Self::Remove => messages::REMOVE_FAILED,
            Self::Update => messages::UPDATE_FAILED,
        }
    }
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "add_product",
            Self::Remove => "remove_product",
            Self::Update => "update_product_amount",
        };
        f.write_str(name)
    }
}

/// Request to set a line item's amount.
///
/// `amount` is signed so that decrementing past one arrives as a value the
/// engine can ignore rather than a conversion error at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Result of a cart operation.
///
/// Operations never return `Err`: a rejection has already been reported to
/// the notifier by the time the caller sees it.
#[derive(Debug)]
#[must_use]
pub enum CartOutcome {
    /// The cart changed and was persisted.
    Committed,
    /// Nothing to do; no notification was emitted.
    Unchanged,
    /// The operation was aborted; memory and storage are untouched.
    Rejected(CartFailure),
}

impl CartOutcome {
    /// Whether the cart changed.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }

    /// Whether the operation was rejected.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The rejection reason, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&CartFailure> {
        match self {
            Self::Rejected(failure) => Some(failure),
            _ => None,
        }
    }
}
