//! Built-in catalog data.

use bouquet_core::ProductId;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{AddOn, BouquetSize, CatalogProduct, Category, Flower, Vase, WrapStyle};

pub fn categories() -> Vec<Category> {
    vec![
        Category {
            slug: "roses",
            name_ar: "ورود",
            name_en: "Roses",
        },
        Category {
            slug: "tulips",
            name_ar: "توليب",
            name_en: "Tulips",
        },
        Category {
            slug: "mixed",
            name_ar: "باقات منوعة",
            name_en: "Mixed Bouquets",
        },
        Category {
            slug: "occasions",
            name_ar: "مناسبات",
            name_en: "Occasions",
        },
    ]
}

struct ProductSeed {
    id: i64,
    name_ar: &'static str,
    name_en: &'static str,
    description: &'static str,
    category: &'static str,
    price: i64,
    sizes: &'static [&'static str],
    colors: &'static [&'static str],
    added_on: (i32, u32, u32),
}

const PRODUCTS: &[ProductSeed] = &[
    ProductSeed {
        id: 1,
        name_ar: "باقة ورد أحمر",
        name_en: "Red Rose Bouquet",
        description: "Classic red roses wrapped in kraft paper",
        category: "roses",
        price: 150,
        sizes: &["small", "medium", "large"],
        colors: &[],
        added_on: (2025, 9, 1),
    },
    ProductSeed {
        id: 2,
        name_ar: "ورد أبيض فاخر",
        name_en: "Luxury White Roses",
        description: "Long-stem white roses in a black box",
        category: "roses",
        price: 220,
        sizes: &["medium", "large"],
        colors: &[],
        added_on: (2025, 11, 12),
    },
    ProductSeed {
        id: 3,
        name_ar: "صندوق ورد وردي",
        name_en: "Pink Rose Box",
        description: "Pink roses arranged in a round hat box",
        category: "roses",
        price: 185,
        sizes: &[],
        colors: &["pink", "blush"],
        added_on: (2026, 1, 5),
    },
    ProductSeed {
        id: 4,
        name_ar: "توليب هولندي",
        name_en: "Dutch Tulips",
        description: "Fresh tulips imported from the Netherlands",
        category: "tulips",
        price: 130,
        sizes: &["small", "medium"],
        colors: &["yellow", "purple", "white"],
        added_on: (2025, 12, 20),
    },
    ProductSeed {
        id: 5,
        name_ar: "ربيع ملون",
        name_en: "Colorful Spring",
        description: "Tulips, daisies and gypsophila",
        category: "mixed",
        price: 175,
        sizes: &["medium", "large"],
        colors: &[],
        added_on: (2025, 10, 3),
    },
    ProductSeed {
        id: 6,
        name_ar: "باقة الزفاف",
        name_en: "Bridal Bouquet",
        description: "White roses and lilies tied with satin ribbon",
        category: "occasions",
        price: 350,
        sizes: &[],
        colors: &[],
        added_on: (2026, 2, 1),
    },
    ProductSeed {
        id: 7,
        name_ar: "مبروك المولود",
        name_en: "Welcome Baby",
        description: "Soft pastel flowers with a teddy bear",
        category: "occasions",
        price: 240,
        sizes: &[],
        colors: &["blue", "pink"],
        added_on: (2025, 8, 15),
    },
    ProductSeed {
        id: 8,
        name_ar: "زنبق وجوري",
        name_en: "Lilies and Damask Roses",
        description: "Taif damask roses with white lilies",
        category: "mixed",
        price: 265,
        sizes: &["medium", "large"],
        colors: &[],
        added_on: (2026, 1, 28),
    },
];

pub fn products() -> Vec<CatalogProduct> {
    PRODUCTS
        .iter()
        .map(|seed| CatalogProduct {
            id: ProductId::Numeric(seed.id),
            name_ar: seed.name_ar.to_string(),
            name_en: seed.name_en.to_string(),
            description: seed.description.to_string(),
            category: seed.category.to_string(),
            price: Decimal::from(seed.price),
            image: Some(format!("/images/products/{}.webp", seed.id)),
            sizes: seed.sizes.iter().map(ToString::to_string).collect(),
            colors: seed.colors.iter().map(ToString::to_string).collect(),
            added_on: NaiveDate::from_ymd_opt(seed.added_on.0, seed.added_on.1, seed.added_on.2),
        })
        .collect()
}

pub fn flowers() -> Vec<Flower> {
    vec![
        Flower {
            id: "rose",
            name_ar: "ورد جوري",
            name_en: "Rose",
            price_per_stem: Decimal::from(12),
            colors: &["red", "white", "pink", "yellow"],
        },
        Flower {
            id: "tulip",
            name_ar: "توليب",
            name_en: "Tulip",
            price_per_stem: Decimal::from(15),
            colors: &["yellow", "purple", "white"],
        },
        Flower {
            id: "lily",
            name_ar: "زنبق",
            name_en: "Lily",
            price_per_stem: Decimal::from(18),
            colors: &["white", "pink"],
        },
        Flower {
            id: "gypsophila",
            name_ar: "جبسوفيلا",
            name_en: "Baby's Breath",
            price_per_stem: Decimal::new(65, 1),
            colors: &["white"],
        },
    ]
}

pub fn sizes() -> Vec<BouquetSize> {
    vec![
        BouquetSize {
            id: "small",
            name_ar: "صغير",
            name_en: "Small",
            multiplier: Decimal::ONE,
        },
        BouquetSize {
            id: "medium",
            name_ar: "متوسط",
            name_en: "Medium",
            multiplier: Decimal::new(12, 1),
        },
        BouquetSize {
            id: "large",
            name_ar: "كبير",
            name_en: "Large",
            multiplier: Decimal::new(15, 1),
        },
    ]
}

pub fn styles() -> Vec<WrapStyle> {
    vec![
        WrapStyle {
            id: "classic",
            name_ar: "كلاسيكي",
            name_en: "Classic",
            price: Decimal::ZERO,
        },
        WrapStyle {
            id: "kraft",
            name_ar: "ورق كرافت",
            name_en: "Kraft Paper",
            price: Decimal::from(10),
        },
        WrapStyle {
            id: "luxury-box",
            name_ar: "صندوق فاخر",
            name_en: "Luxury Box",
            price: Decimal::from(45),
        },
    ]
}

pub fn vases() -> Vec<Vase> {
    vec![
        Vase {
            id: "glass",
            name_ar: "مزهرية زجاج",
            name_en: "Glass Vase",
            price: Decimal::from(35),
        },
        Vase {
            id: "ceramic",
            name_ar: "مزهرية سيراميك",
            name_en: "Ceramic Vase",
            price: Decimal::from(55),
        },
    ]
}

pub fn add_ons() -> Vec<AddOn> {
    vec![
        AddOn {
            id: "chocolate",
            name_ar: "شوكولاتة",
            name_en: "Chocolate",
            price: Decimal::from(40),
        },
        AddOn {
            id: "gift-wrap",
            name_ar: "تغليف هدية",
            name_en: "Gift Wrap",
            price: Decimal::from(15),
        },
        AddOn {
            id: "balloon",
            name_ar: "بالون",
            name_en: "Balloon",
            price: Decimal::from(25),
        },
    ]
}
