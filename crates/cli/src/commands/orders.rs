//! Checkout and order history commands.
//!
//! # Usage
//!
//! ```bash
//! bq-cli checkout --name "نورة" --phone 0501234567 --city الرياض \
//!     --address "حي الملقا" --date 2026-03-01 --note "كل عام وأنت بخير"
//! bq-cli orders list
//! bq-cli orders cancel 1767225600000
//! ```

use bouquet_core::OrderId;
use bouquet_storefront::Storefront;
use bouquet_storefront::stores::{CheckoutDetails, Order};

use super::Result;
use crate::output::{Output, format_lines, format_order, symbols};

/// Place an order for the cart.
pub fn checkout(storefront: &Storefront, out: Output, details: CheckoutDetails) -> Result<()> {
    let order = storefront.orders().place_order(storefront.cart(), details)?;

    out.emit(&order, || {
        format!(
            "{} Order #{} placed\n{}\n  subtotal {}\n  delivery {}\n  total    {}",
            symbols::SUCCESS,
            order.id,
            format_lines(&order.lines, order.total.currency_code),
            order.subtotal,
            order.delivery_fee,
            order.total
        )
    })?;
    Ok(())
}

/// List orders, newest first.
pub fn list(storefront: &Storefront, out: Output) -> Result<()> {
    let orders: Vec<Order> = storefront.orders().history();

    out.emit(&orders, || {
        if orders.is_empty() {
            return "No orders yet".to_string();
        }
        orders.iter().map(format_order).collect::<Vec<_>>().join("\n")
    })?;
    Ok(())
}

/// Cancel an order.
pub fn cancel(storefront: &Storefront, out: Output, id: OrderId) -> Result<()> {
    let order = storefront.orders().cancel(id)?;
    out.success(&format!("Order #{id} cancelled"), &order)?;
    Ok(())
}
