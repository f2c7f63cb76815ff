//! RocketShoes Core - Cart data model.
//!
//! This crate provides the types shared by the cart engine and its front ends:
//! - `rocketshoes-cart` - Cart state engine, storage and service adapters
//! - `rocketshoes-cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure transformations - no I/O, no
//! storage access, no HTTP clients. Every cart transformation returns a new
//! value so callers can decide when (and whether) to commit it.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, catalog and stock records, line items and carts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
