//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Add a catalog product; title and price come from the catalog
//! bq-cli cart add --id 1 --size medium --card-message "كل عام وأنت بخير"
//!
//! # Adding the same configuration again increments the existing line
//! bq-cli cart add --id 1 --size medium --card-message "كل عام وأنت بخير" --quantity 2
//!
//! bq-cli cart list
//! bq-cli cart set <key> 3
//! bq-cli cart remove <key>
//! bq-cli cart clear
//! ```

use bouquet_core::{LineRef, ProductId, ProductInput};
use bouquet_storefront::Storefront;
use rust_decimal::Decimal;
use serde_json::json;

use super::Result;
use crate::output::{Output, format_line, format_lines, symbols};

/// Options for `cart add`.
#[derive(Debug)]
pub struct AddArgs {
    pub id: ProductId,
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<u32>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
    pub card_message: Option<String>,
    pub chocolate: bool,
    pub gift_wrap: bool,
}

impl AddArgs {
    /// Build the add-request, filling title, image and price from the
    /// catalog when the product is a catalog product.
    fn into_input(self, storefront: &Storefront) -> ProductInput {
        let mut input = storefront
            .catalog()
            .product(&self.id)
            .map_or_else(|| ProductInput::new(self.id.clone()), |p| p.to_product_input());

        if let Some(title) = self.title {
            input = input.with_title(title);
        }
        if let Some(price) = self.price {
            input = input.with_price(price);
        }
        if let Some(quantity) = self.quantity {
            input = input.with_quantity(quantity);
        }
        if let Some(size) = self.size {
            input = input.with_size(size);
        }
        if let Some(color) = self.color {
            input = input.with_color(color);
        }
        if let Some(style) = self.style {
            input = input.with_style(style);
        }
        if let Some(message) = self.card_message {
            input = input.with_card(message);
        }
        if self.chocolate {
            input = input.with_chocolate();
        }
        if self.gift_wrap {
            input = input.with_gift_wrap();
        }
        input
    }
}

/// Add a product to the cart.
pub fn add(storefront: &Storefront, out: Output, args: AddArgs) -> Result<()> {
    let input = args.into_input(storefront);
    let outcome = storefront.cart().add(&input)?;
    let currency = storefront.cart().currency();

    let Some(line) = outcome.line() else {
        return Ok(());
    };
    let verb = if outcome.is_new { "Added" } else { "Updated" };

    out.emit(line, || {
        format!(
            "{} {verb} {}\n{}\n{} {} items in cart",
            symbols::SUCCESS,
            line.title,
            format_line(line, currency),
            symbols::ARROW,
            storefront.cart().item_count()
        )
    })?;
    Ok(())
}

/// Show the cart.
pub fn list(storefront: &Storefront, out: Output) -> Result<()> {
    let cart = storefront.cart();
    let lines = cart.lines();
    let subtotal = cart.subtotal();

    let value = json!({
        "lines": lines,
        "itemCount": cart.item_count(),
        "subtotal": subtotal,
    });

    out.emit(&value, || {
        if lines.is_empty() {
            return "Your cart is empty".to_string();
        }
        format!(
            "{}\n{} {} items, subtotal {}",
            format_lines(&lines, cart.currency()),
            symbols::ARROW,
            cart.item_count(),
            subtotal
        )
    })?;
    Ok(())
}

/// Remove lines by fingerprint or by product id.
pub fn remove(storefront: &Storefront, out: Output, target: &LineRef) -> Result<()> {
    let remaining = storefront.cart().remove(target)?;
    out.success(&format!("Removed {target}"), &remaining)?;
    Ok(())
}

/// Set a line's quantity.
pub fn set_quantity(storefront: &Storefront, out: Output, key: &str, quantity: u32) -> Result<()> {
    let lines = storefront.cart().set_quantity(key, quantity)?;
    out.success(&format!("Quantity set to {quantity}"), &lines)?;
    Ok(())
}

/// Empty the cart.
pub fn clear(storefront: &Storefront, out: Output) -> Result<()> {
    storefront.cart().clear()?;
    out.success("Cart cleared", &json!({ "lines": [] }))?;
    Ok(())
}
