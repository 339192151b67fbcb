//! Client-side state containers.
//!
//! Each store owns one storage key, reads it leniently, and after every
//! successful write publishes a single [`StoreEvent`](crate::events::StoreEvent).
//!
//! # Stores
//!
//! - [`cart`] - Cart lines, merged by fingerprint
//! - [`favorites`] - Favorite product ids
//! - [`orders`] - Mock checkout and order history
//! - [`auth`] - Mock phone login session

pub mod auth;
pub mod cart;
pub mod favorites;
pub mod orders;

pub use auth::{AuthStore, PendingLogin, Session};
pub use cart::CartStore;
pub use favorites::FavoritesStore;
pub use orders::{CheckoutDetails, Order, OrderStore, PaymentMethod};
