//! Bouquet Core - Shared types and the cart identity engine.
//!
//! This crate provides the domain types used across all Bouquet components:
//! - `storefront` - Stores, storage, catalog and bouquet configurator
//! - `cli` - Command-line front end over a file-backed store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows the cart
//! engine to be tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product/order IDs, prices, phone numbers and statuses
//! - [`cart`] - Cart line identity (fingerprints) and the add/merge engine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{AddOutcome, CartError, CartLine, LineOptions, LineRef, ProductInput};
pub use types::*;
