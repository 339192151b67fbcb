//! CLI output formatting.
//!
//! Results go to stdout as text or, with `--json`, as pretty-printed JSON.
//! Logs go to stderr so they never mix with either.

use bouquet_core::{CartLine, CurrencyCode};
use bouquet_storefront::catalog::CatalogProduct;
use bouquet_storefront::stores::Order;
use serde::Serialize;

pub mod symbols {
    pub const SUCCESS: &str = "✓";
    pub const INFO: &str = "•";
    pub const ARROW: &str = "→";
}

/// Where command results are printed.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or the text built by `text`.
    #[allow(clippy::print_stdout)]
    pub fn emit<T, F>(self, value: &T, text: F) -> Result<(), serde_json::Error>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }

    /// Print a one-line confirmation, plus `value` when in JSON mode.
    pub fn success<T: Serialize + ?Sized>(
        self,
        message: &str,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        self.emit(value, || format!("{} {message}", symbols::SUCCESS))
    }
}

pub fn format_line(line: &CartLine, currency: CurrencyCode) -> String {
    let mut options = Vec::new();
    if let Some(size) = &line.options.size {
        options.push(format!("size={size}"));
    }
    if let Some(color) = &line.options.color {
        options.push(format!("color={color}"));
    }
    if let Some(style) = &line.options.style {
        options.push(format!("style={style}"));
    }
    if line.options.add_chocolate == Some(true) {
        options.push("chocolate".to_string());
    }
    if line.options.gift_wrap == Some(true) {
        options.push("gift-wrap".to_string());
    }
    if let Some(message) = &line.options.card_message {
        options.push(format!("card=\"{message}\""));
    }
    if line.options.custom_data.is_some() {
        options.push("custom".to_string());
    }

    let options = if options.is_empty() {
        String::new()
    } else {
        format!(" [{}]", options.join(", "))
    };

    format!(
        "{} {} × {}{options}  {}\n    key: {}",
        symbols::INFO,
        line.title,
        line.quantity,
        line.line_total(currency),
        line.effective_key()
    )
}

pub fn format_lines(lines: &[CartLine], currency: CurrencyCode) -> String {
    lines
        .iter()
        .map(|line| format_line(line, currency))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_product(product: &CatalogProduct, currency: CurrencyCode) -> String {
    let price = bouquet_core::Price::new(product.price, currency);
    format!(
        "{:>4}  {} / {}  {}  ({})",
        product.id.to_string(),
        product.name_ar,
        product.name_en,
        price,
        product.category
    )
}

pub fn format_order(order: &Order) -> String {
    format!(
        "#{}  {}  {} items  {}  {} {} {}",
        order.id,
        order.placed_at.format("%Y-%m-%d %H:%M"),
        order.item_count(),
        order.total,
        order.status.label_ar(),
        symbols::ARROW,
        order.delivery_date
    )
}
