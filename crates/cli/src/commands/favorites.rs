//! Favorites commands.

use bouquet_core::ProductId;
use bouquet_storefront::Storefront;
use serde_json::json;

use super::Result;
use crate::output::{Output, format_product, symbols};

/// Add or remove a favorite.
pub fn toggle(storefront: &Storefront, out: Output, id: &ProductId) -> Result<()> {
    let added = storefront.favorites().toggle(id)?;
    let message = if added {
        format!("Added {id} to favorites")
    } else {
        format!("Removed {id} from favorites")
    };
    out.success(&message, &json!({ "id": id, "favorite": added }))?;
    Ok(())
}

/// List favorites, with catalog details where known.
pub fn list(storefront: &Storefront, out: Output) -> Result<()> {
    let ids = storefront.favorites().list();
    let currency = storefront.config().currency;

    out.emit(&ids, || {
        if ids.is_empty() {
            return "No favorites yet".to_string();
        }
        ids.iter()
            .map(|id| {
                storefront.catalog().product(id).map_or_else(
                    || format!("{:>4}  {} (not in catalog)", id.to_string(), symbols::INFO),
                    |product| format_product(product, currency),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    Ok(())
}
