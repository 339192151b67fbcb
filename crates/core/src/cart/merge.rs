//! Add, merge, remove and total operations over a cart.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::CartError;
use super::key::{generate_product_key, line_key};
use super::line::{AddOutcome, CartLine, LineRef, ProductInput};
use crate::types::{CurrencyCode, Price, ProductId};

/// Find the first line with the same identity as `candidate`.
///
/// A candidate without an id matches nothing, since every stored line has one.
#[must_use]
pub fn find_product_in_cart(cart: &[CartLine], candidate: &ProductInput) -> Option<usize> {
    let key = generate_product_key(candidate).ok()?;
    position_of_key(cart, &key)
}

/// Like [`find_product_in_cart`], but over a raw persisted value.
///
/// Anything that is not a list finds nothing, and entries that cannot be
/// read as cart lines are skipped rather than failing the lookup.
#[must_use]
pub fn find_product_in_value(cart: &Value, candidate: &ProductInput) -> Option<usize> {
    let Value::Array(entries) = cart else {
        return None;
    };
    let key = generate_product_key(candidate).ok()?;

    entries.iter().position(|entry| {
        CartLine::deserialize(entry).is_ok_and(|line| line.effective_key() == key)
    })
}

/// Read a raw persisted value as a list of cart lines.
///
/// # Errors
///
/// Returns [`CartError::NotAnArray`] if the value is not a list and
/// [`CartError::MalformedLine`] for the first entry that is not a cart line.
pub fn lines_from_value(cart: &Value) -> Result<Vec<CartLine>, CartError> {
    let Value::Array(entries) = cart else {
        return Err(CartError::NotAnArray);
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            CartLine::deserialize(entry).map_err(|e| CartError::MalformedLine {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Add a product to the cart, merging with an existing line of the same identity.
///
/// The input cart is never modified. When a matching line exists its quantity
/// is increased and every other field is kept; otherwise a new line is
/// appended with its fingerprint stored in `unique_key`. A numeric id of `0`
/// is replaced by a fresh id derived from the current time.
///
/// # Errors
///
/// Returns [`CartError::MissingProductId`] if the input has no id,
/// [`CartError::InvalidQuantity`] if the quantity is not a positive whole
/// number, and [`CartError::QuantityOverflow`] if the merged quantity would
/// not fit.
pub fn add_product_to_cart(
    cart: &[CartLine],
    input: &ProductInput,
) -> Result<AddOutcome, CartError> {
    let id = input.id.as_ref().ok_or(CartError::MissingProductId)?;
    let quantity = input.resolved_quantity()?;

    let mut updated = cart.to_vec();

    if let Some(index) = find_product_in_cart(&updated, input)
        && let Some(line) = updated.get_mut(index)
    {
        line.quantity = line
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| CartError::QuantityOverflow(line.effective_key()))?;

        return Ok(AddOutcome {
            cart: updated,
            is_new: false,
            index,
        });
    }

    let id = if id.is_zero() {
        fresh_line_id(&updated, input)
    } else {
        id.clone()
    };

    let unique_key = line_key(&id, &input.options);
    updated.push(CartLine {
        id,
        unique_key: Some(unique_key),
        title: input.title.clone().unwrap_or_default(),
        image: input.image.clone(),
        price: input.price.unwrap_or_default(),
        quantity,
        options: input.options.clone(),
    });

    Ok(AddOutcome {
        index: updated.len() - 1,
        cart: updated,
        is_new: true,
    })
}

/// Like [`add_product_to_cart`], but over a raw persisted value.
///
/// # Errors
///
/// Returns [`CartError::NotAnArray`] if `cart` is not a list, plus every
/// error of [`lines_from_value`] and [`add_product_to_cart`].
pub fn add_product_to_value(cart: &Value, input: &ProductInput) -> Result<AddOutcome, CartError> {
    let lines = lines_from_value(cart)?;
    add_product_to_cart(&lines, input)
}

/// Remove the lines selected by `target`.
///
/// # Errors
///
/// Returns [`CartError::LineNotFound`] if nothing matched.
pub fn remove_product(cart: &[CartLine], target: &LineRef) -> Result<Vec<CartLine>, CartError> {
    let keep = |line: &CartLine| match target {
        LineRef::Key(key) => line.effective_key() != *key,
        LineRef::Product(id) => line.id != *id,
    };

    let remaining: Vec<CartLine> = cart.iter().filter(|line| keep(line)).cloned().collect();
    if remaining.len() == cart.len() {
        return Err(CartError::LineNotFound(target.to_string()));
    }
    Ok(remaining)
}

/// Set the quantity of the line identified by `key`.
///
/// # Errors
///
/// Returns [`CartError::InvalidQuantity`] for a zero quantity (use
/// [`remove_product`] instead) and [`CartError::LineNotFound`] if no line has
/// that key.
pub fn update_quantity(
    cart: &[CartLine],
    key: &str,
    quantity: u32,
) -> Result<Vec<CartLine>, CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity(quantity.to_string()));
    }

    let index =
        position_of_key(cart, key).ok_or_else(|| CartError::LineNotFound(key.to_owned()))?;

    let mut updated = cart.to_vec();
    if let Some(line) = updated.get_mut(index) {
        line.quantity = quantity;
    }
    Ok(updated)
}

/// Total number of items across all lines.
#[must_use]
pub fn cart_item_count(cart: &[CartLine]) -> u32 {
    cart.iter()
        .fold(0_u32, |total, line| total.saturating_add(line.quantity))
}

/// Sum of unit price times quantity across all lines.
#[must_use]
pub fn cart_subtotal(cart: &[CartLine], currency: CurrencyCode) -> Price {
    let amount = cart
        .iter()
        .map(|line| line.line_total(currency).amount)
        .sum::<Decimal>();
    Price::new(amount, currency)
}

fn position_of_key(cart: &[CartLine], key: &str) -> Option<usize> {
    cart.iter().position(|line| line.effective_key() == key)
}

/// Pick a timestamp-derived id whose fingerprint no existing line uses.
///
/// Two zero-id adds within the same millisecond would otherwise collide.
fn fresh_line_id(cart: &[CartLine], input: &ProductInput) -> ProductId {
    let taken: HashSet<String> = cart.iter().map(CartLine::effective_key).collect();
    let mut candidate = chrono::Utc::now().timestamp_millis().max(1);

    loop {
        let id = ProductId::Numeric(candidate);
        if !taken.contains(&line_key(&id, &input.options)) {
            return id;
        }
        candidate = candidate.saturating_add(1);
    }
}
