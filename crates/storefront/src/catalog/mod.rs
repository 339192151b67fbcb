//! Product catalog.
//!
//! The shop's flowers, bouquets and configurator options ship with the
//! binary; [`remote`] adds products from the demo product API.
//!
//! # Listing helpers
//!
//! [`filter_by_category`], [`search`] and [`sort_products`] work on any slice
//! of [`CatalogProduct`]s, whichever source they came from.

mod bouquet;
mod data;
pub mod remote;

pub use bouquet::{
    BouquetBuilder, BouquetError, BouquetStep, CUSTOM_BOUQUET_ID, CustomBouquet, FlowerSelection,
    MAX_STEMS,
};
pub use remote::RemoteCatalogClient;

use std::cmp::Reverse;
use std::str::FromStr;

use bouquet_core::{ProductId, ProductInput};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Products
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub slug: &'static str,
    pub name_ar: &'static str,
    pub name_en: &'static str,
}

/// A product listed in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name_ar: String,
    pub name_en: String,
    #[serde(default)]
    pub description: String,
    /// Category slug
    pub category: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Sizes the product can be ordered in, empty if it has a single size
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
    /// Colors the product can be ordered in, empty if it has a single color
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_on: Option<NaiveDate>,
}

impl CatalogProduct {
    /// Start a cart input for this product, titled in Arabic.
    ///
    /// Callers add the chosen size, color and extras before adding to cart.
    #[must_use]
    pub fn to_product_input(&self) -> ProductInput {
        let input = ProductInput::new(self.id.clone())
            .with_title(self.name_ar.clone())
            .with_price(self.price);

        match &self.image {
            Some(image) => input.with_image(image.clone()),
            None => input,
        }
    }

    fn matches(&self, needle: &str) -> bool {
        [&self.name_ar, &self.name_en, &self.description]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Ordering for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    PriceAsc,
    PriceDesc,
    Name,
    Newest,
}

impl FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "price-asc" | "price" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            "newest" => Ok(Self::Newest),
            other => Err(format!(
                "unknown sort `{other}`, expected price-asc, price-desc, name or newest"
            )),
        }
    }
}

/// Products in the category with slug `category`.
#[must_use]
pub fn filter_by_category<'a>(products: &'a [CatalogProduct], category: &str) -> Vec<&'a CatalogProduct> {
    products
        .iter()
        .filter(|product| product.category.eq_ignore_ascii_case(category))
        .collect()
}

/// Products whose Arabic name, English name or description contains `query`,
/// ignoring case. A blank query matches everything.
#[must_use]
pub fn search<'a>(products: &'a [CatalogProduct], query: &str) -> Vec<&'a CatalogProduct> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(|product| needle.is_empty() || product.matches(&needle))
        .collect()
}

/// Sort `products` in place. The sort is stable.
pub fn sort_products(products: &mut [&CatalogProduct], sort: ProductSort) {
    match sort {
        ProductSort::PriceAsc => products.sort_by_key(|p| p.price),
        ProductSort::PriceDesc => products.sort_by_key(|p| Reverse(p.price)),
        ProductSort::Name => products.sort_by(|a, b| a.name_ar.cmp(&b.name_ar)),
        // Undated products go last
        ProductSort::Newest => products.sort_by_key(|p| Reverse(p.added_on)),
    }
}

// =============================================================================
// Configurator Options
// =============================================================================

/// A flower sold by the stem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flower {
    pub id: &'static str,
    pub name_ar: &'static str,
    pub name_en: &'static str,
    pub price_per_stem: Decimal,
    pub colors: &'static [&'static str],
}

/// A bouquet size; scales the flower cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BouquetSize {
    pub id: &'static str,
    pub name_ar: &'static str,
    pub name_en: &'static str,
    pub multiplier: Decimal,
}

/// A wrapping style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrapStyle {
    pub id: &'static str,
    pub name_ar: &'static str,
    pub name_en: &'static str,
    pub price: Decimal,
}

/// A vase the bouquet can be delivered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vase {
    pub id: &'static str,
    pub name_ar: &'static str,
    pub name_en: &'static str,
    pub price: Decimal,
}

/// An extra item delivered with the bouquet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOn {
    pub id: &'static str,
    pub name_ar: &'static str,
    pub name_en: &'static str,
    pub price: Decimal,
}

// =============================================================================
// Catalog
// =============================================================================

/// Everything the shop sells.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<CatalogProduct>,
    flowers: Vec<Flower>,
    sizes: Vec<BouquetSize>,
    styles: Vec<WrapStyle>,
    vases: Vec<Vase>,
    add_ons: Vec<AddOn>,
}

impl Catalog {
    /// The catalog shipped with the shop.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            categories: data::categories(),
            products: data::products(),
            flowers: data::flowers(),
            sizes: data::sizes(),
            styles: data::styles(),
            vases: data::vases(),
            add_ons: data::add_ons(),
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&CatalogProduct> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Filtered, searched and sorted product listing.
    #[must_use]
    pub fn listing(
        &self,
        category: Option<&str>,
        query: Option<&str>,
        sort: ProductSort,
    ) -> Vec<&CatalogProduct> {
        let mut listed: Vec<&CatalogProduct> = match query {
            Some(query) => search(&self.products, query),
            None => self.products.iter().collect(),
        };
        if let Some(category) = category {
            listed.retain(|product| product.category.eq_ignore_ascii_case(category));
        }
        sort_products(&mut listed, sort);
        listed
    }

    #[must_use]
    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    #[must_use]
    pub fn sizes(&self) -> &[BouquetSize] {
        &self.sizes
    }

    #[must_use]
    pub fn styles(&self) -> &[WrapStyle] {
        &self.styles
    }

    #[must_use]
    pub fn vases(&self) -> &[Vase] {
        &self.vases
    }

    #[must_use]
    pub fn add_ons(&self) -> &[AddOn] {
        &self.add_ons
    }

    #[must_use]
    pub fn flower(&self, id: &str) -> Option<&Flower> {
        self.flowers.iter().find(|flower| flower.id == id)
    }

    #[must_use]
    pub fn size(&self, id: &str) -> Option<&BouquetSize> {
        self.sizes.iter().find(|size| size.id == id)
    }

    #[must_use]
    pub fn style(&self, id: &str) -> Option<&WrapStyle> {
        self.styles.iter().find(|style| style.id == id)
    }

    #[must_use]
    pub fn vase(&self, id: &str) -> Option<&Vase> {
        self.vases.iter().find(|vase| vase.id == id)
    }

    #[must_use]
    pub fn add_on(&self, id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|add_on| add_on.id == id)
    }
}
