//! CLI command implementations.

pub mod cart;

use rocketshoes_cart::services::ServiceError;
use thiserror::Error;

/// Errors that stop a command before or after the cart operation runs.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Building the stock and catalog backend failed.
    #[error("inventory backend: {0}")]
    Backend(#[from] ServiceError),

    /// Writing output failed.
    #[error("output: {0}")]
    Output(#[from] std::io::Error),
}
