//! Cart lines and the cart identity engine.
//!
//! A cart is a flat, ordered list of [`CartLine`]s. Several lines may share a
//! product id; what makes a line unique is its fingerprint (`uniqueKey`),
//! derived from the product id and every option that changes what the
//! customer receives (size, card, chocolate, wrapping, style, color and any
//! custom-bouquet payload).
//!
//! All functions here are pure: they take the current cart by reference and
//! return a new `Vec`. Persisting the result and announcing the change is the
//! caller's job.
//!
//! # Example
//!
//! ```
//! use bouquet_core::cart::{self, ProductInput};
//!
//! let red_roses = ProductInput::new(10).with_title("Red Roses").with_size("medium");
//!
//! let first = cart::add_product_to_cart(&[], &red_roses).unwrap();
//! assert!(first.is_new);
//!
//! let second = cart::add_product_to_cart(&first.cart, &red_roses.clone().with_quantity(2)).unwrap();
//! assert!(!second.is_new);
//! assert_eq!(second.cart.len(), 1);
//! assert_eq!(second.cart[0].quantity, 3);
//! ```

mod key;
mod line;
mod merge;

pub use key::{generate_product_key, line_key};
pub use line::{AddOutcome, CartLine, LineOptions, LineRef, ProductInput};
pub use merge::{
    add_product_to_cart, add_product_to_value, cart_item_count, cart_subtotal,
    find_product_in_cart, find_product_in_value, lines_from_value, remove_product,
    update_quantity,
};

use thiserror::Error;

/// Validation errors raised by cart operations.
///
/// Every variant is raised before any new cart is built, so a failed call
/// never produces a partially updated cart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The persisted cart value is not a list.
    #[error("cart must be a list of lines")]
    NotAnArray,

    /// A persisted cart entry could not be read as a cart line.
    #[error("cart line {index} is malformed: {reason}")]
    MalformedLine {
        /// Position of the entry in the list.
        index: usize,
        /// Parser message.
        reason: String,
    },

    /// The product has no id.
    #[error("product id is required")]
    MissingProductId,

    /// The quantity is not a positive whole number.
    #[error("quantity must be a positive whole number (got {0})")]
    InvalidQuantity(String),

    /// Adding would push a line's quantity past what can be stored.
    #[error("quantity for {0} is too large")]
    QuantityOverflow(String),

    /// No line matched the given key or product id.
    #[error("cart line not found: {0}")]
    LineNotFound(String),
}
