//! Bouquet storefront library.
//!
//! Client-side state for the flower shop: the cart, favorites, mock checkout
//! and login, all persisted to a key-value store, plus the product catalog
//! and custom bouquet configurator.
//!
//! # Example
//!
//! ```rust
//! use bouquet_core::ProductInput;
//! use bouquet_storefront::{Storefront, config::StorefrontConfig};
//!
//! let storefront = Storefront::in_memory(StorefrontConfig::default());
//! storefront.cart().add(&ProductInput::new(10).with_size("medium")).unwrap();
//! storefront.cart().add(&ProductInput::new(10).with_size("medium")).unwrap();
//!
//! assert_eq!(storefront.cart().lines().len(), 1);
//! assert_eq!(storefront.cart().item_count(), 2);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod state;
pub mod storage;
pub mod stores;

pub use error::{AppError, Result};
pub use state::Storefront;
