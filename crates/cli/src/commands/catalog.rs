//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! bq-cli catalog list --category roses --sort price-desc
//! bq-cli catalog list --search tulip
//! bq-cli catalog options
//! bq-cli catalog remote --limit 5 --search phone
//! ```

use bouquet_core::ProductId;
use bouquet_storefront::Storefront;
use bouquet_storefront::catalog::{CatalogProduct, ProductSort, sort_products};
use serde_json::json;

use super::{CliError, Result};
use crate::output::{Output, format_product, symbols};

/// List built-in products.
pub fn list(
    storefront: &Storefront,
    out: Output,
    category: Option<&str>,
    search: Option<&str>,
    sort: ProductSort,
) -> Result<()> {
    let products = storefront.catalog().listing(category, search, sort);
    let currency = storefront.config().currency;

    out.emit(&products, || {
        if products.is_empty() {
            return "No products match".to_string();
        }
        products
            .iter()
            .map(|product| format_product(product, currency))
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    Ok(())
}

/// Show one built-in product.
pub fn show(storefront: &Storefront, out: Output, id: &ProductId) -> Result<()> {
    let product = storefront
        .catalog()
        .product(id)
        .ok_or_else(|| CliError::App(bouquet_storefront::AppError::NotFound(id.to_string())))?;
    let currency = storefront.config().currency;

    out.emit(product, || {
        let mut text = format_product(product, currency);
        if !product.description.is_empty() {
            text.push_str(&format!("\n      {}", product.description));
        }
        if !product.sizes.is_empty() {
            text.push_str(&format!("\n      sizes: {}", product.sizes.join(", ")));
        }
        if !product.colors.is_empty() {
            text.push_str(&format!("\n      colors: {}", product.colors.join(", ")));
        }
        text
    })?;
    Ok(())
}

/// List the configurator's flowers, sizes, styles, vases and add-ons.
pub fn options(storefront: &Storefront, out: Output) -> Result<()> {
    let catalog = storefront.catalog();
    let value = json!({
        "flowers": catalog.flowers(),
        "sizes": catalog.sizes(),
        "styles": catalog.styles(),
        "vases": catalog.vases(),
        "addOns": catalog.add_ons(),
    });

    out.emit(&value, || {
        let mut lines = vec!["Flowers (price per stem):".to_string()];
        lines.extend(catalog.flowers().iter().map(|f| {
            format!(
                "  {} {:<12} {} / {}  {}  colors: {}",
                symbols::INFO,
                f.id,
                f.name_ar,
                f.name_en,
                f.price_per_stem,
                f.colors.join(", ")
            )
        }));
        lines.push("Sizes (flower cost multiplier):".to_string());
        lines.extend(
            catalog
                .sizes()
                .iter()
                .map(|s| format!("  {} {:<12} {}  ×{}", symbols::INFO, s.id, s.name_ar, s.multiplier)),
        );
        lines.push("Styles:".to_string());
        lines.extend(
            catalog
                .styles()
                .iter()
                .map(|s| format!("  {} {:<12} {}  +{}", symbols::INFO, s.id, s.name_ar, s.price)),
        );
        lines.push("Vases:".to_string());
        lines.extend(
            catalog
                .vases()
                .iter()
                .map(|v| format!("  {} {:<12} {}  +{}", symbols::INFO, v.id, v.name_ar, v.price)),
        );
        lines.push("Add-ons:".to_string());
        lines.extend(
            catalog
                .add_ons()
                .iter()
                .map(|a| format!("  {} {:<12} {}  +{}", symbols::INFO, a.id, a.name_ar, a.price)),
        );
        lines.join("\n")
    })?;
    Ok(())
}

/// List products from the demo product API.
pub async fn remote(
    storefront: &Storefront,
    out: Output,
    limit: u32,
    skip: u32,
    search: Option<&str>,
    sort: ProductSort,
) -> Result<()> {
    let page = match search {
        Some(query) => storefront.remote().search(query).await?,
        None => storefront.remote().products(limit, skip).await?,
    };

    let mut products: Vec<&CatalogProduct> = page.products.iter().collect();
    sort_products(&mut products, sort);
    let currency = storefront.config().currency;

    out.emit(&products, || {
        let mut lines: Vec<String> = products
            .iter()
            .map(|product| format_product(product, currency))
            .collect();
        lines.push(format!(
            "{} showing {} of {}{}",
            symbols::INFO,
            products.len(),
            page.total,
            if page.has_more() { ", use --skip for more" } else { "" }
        ));
        lines.join("\n")
    })?;
    Ok(())
}
