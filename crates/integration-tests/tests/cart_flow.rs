//! Cart behavior through the storefront stores.
//!
//! Covers merging by fingerprint, editing lines, and the one-event-per-write
//! contract the header badge relies on.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use bouquet_core::{CartError, LineRef, ProductId, ProductInput};
use bouquet_integration_tests::TestContext;
use bouquet_storefront::AppError;
use bouquet_storefront::catalog::BouquetBuilder;
use bouquet_storefront::events::StoreEvent;
use rust_decimal_macros::dec;
use serde_json::json;

fn red_roses() -> ProductInput {
    ProductInput::new(1)
        .with_title("باقة ورد أحمر")
        .with_price(dec!(150))
        .with_size("medium")
        .with_color("red")
}

// ===== Merging =====

#[test]
fn test_same_configuration_merges_into_one_line() {
    let ctx = TestContext::new();
    let cart = ctx.storefront.cart();

    let first = cart.add(&red_roses()).unwrap();
    let second = cart.add(&red_roses().with_quantity(2)).unwrap();

    assert!(first.is_new);
    assert!(!second.is_new);
    assert_eq!(second.index, first.index);

    let lines = cart.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 3);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.subtotal().amount, dec!(450));
}

#[test]
fn test_different_options_make_separate_lines() {
    let ctx = TestContext::new();
    let cart = ctx.storefront.cart();

    cart.add(&red_roses()).unwrap();
    cart.add(&red_roses().with_size("large")).unwrap();
    cart.add(&red_roses().with_card("كل عام وأنت بخير")).unwrap();

    let lines = cart.lines();
    assert_eq!(lines.len(), 3);
    let mut keys: Vec<String> = lines.iter().map(|l| l.effective_key()).collect();
    keys.dedup();
    assert_eq!(keys.len(), 3);
    assert!(keys.iter().all(|k| k.starts_with("1_")));
}

#[test]
fn test_numeric_and_string_ids_merge() {
    let ctx = TestContext::new();
    let cart = ctx.storefront.cart();

    cart.add(&ProductInput::new(7).with_price(dec!(99))).unwrap();
    let outcome = cart
        .add(&ProductInput::new(ProductId::from("7")).with_price(dec!(99)))
        .unwrap();

    assert!(!outcome.is_new);
    assert_eq!(cart.lines().len(), 1);
}

#[test]
fn test_ui_payload_merges_with_builder_input() {
    let ctx = TestContext::new();
    let cart = ctx.storefront.cart();

    cart.add(&red_roses()).unwrap();
    let from_ui = ProductInput::from_value(json!({
        "id": 1,
        "title": "باقة ورد أحمر",
        "price": "150",
        "color": "red",
        "size": "medium",
        "quantity": 1
    }))
    .unwrap();
    let outcome = cart.add(&from_ui).unwrap();

    assert!(!outcome.is_new);
    assert_eq!(cart.lines()[0].quantity, 2);
}

#[test]
fn test_identical_custom_bouquets_merge() {
    let ctx = TestContext::new();
    let catalog = ctx.storefront.catalog();

    let build = |first: &str, second: &str| {
        let mut builder = BouquetBuilder::new(catalog);
        builder.add_flower(first, None, 5).unwrap();
        builder.add_flower(second, None, 3).unwrap();
        builder.choose_size("medium").unwrap();
        builder.toggle_add_on("chocolate").unwrap();
        builder.into_product_input().unwrap()
    };

    let cart = ctx.storefront.cart();
    cart.add(&build("rose", "tulip")).unwrap();
    // Same bouquet, flowers picked in the other order
    let outcome = cart.add(&build("tulip", "rose")).unwrap();

    assert!(!outcome.is_new);
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 2);
}

// ===== Editing =====

#[test]
fn test_set_quantity_and_remove_by_key() {
    let ctx = TestContext::new();
    let cart = ctx.storefront.cart();

    let key = cart
        .add(&red_roses())
        .unwrap()
        .line()
        .unwrap()
        .effective_key();
    cart.add(&ProductInput::new(2).with_price(dec!(120))).unwrap();

    cart.set_quantity(&key, 5).unwrap();
    assert_eq!(cart.item_count(), 6);

    let remaining = cart.remove(&LineRef::Key(key)).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, ProductId::from(2));
}

#[test]
fn test_remove_by_product_drops_every_variant() {
    let ctx = TestContext::new();
    let cart = ctx.storefront.cart();

    cart.add(&red_roses()).unwrap();
    cart.add(&red_roses().with_size("large")).unwrap();
    cart.add(&ProductInput::new(2).with_price(dec!(120))).unwrap();

    let remaining = cart.remove(&LineRef::Product(ProductId::from(1))).unwrap();
    assert_eq!(remaining.len(), 1);
}

// ===== Failures =====

#[test]
fn test_invalid_quantity_leaves_cart_untouched() {
    let ctx = TestContext::new();
    let cart = ctx.storefront.cart();
    cart.add(&red_roses()).unwrap();
    let before = cart.lines();

    let err = cart.add(&red_roses().with_quantity(0)).unwrap_err();

    assert!(matches!(
        err,
        AppError::Cart(CartError::InvalidQuantity(_))
    ));
    assert_eq!(cart.lines(), before);
}

#[test]
fn test_missing_id_is_rejected() {
    let ctx = TestContext::new();
    let input = ProductInput::from_value(json!({ "title": "بدون رقم", "price": "10" })).unwrap();

    let err = ctx.storefront.cart().add(&input).unwrap_err();

    assert!(matches!(err, AppError::Cart(CartError::MissingProductId)));
    assert!(ctx.storefront.cart().lines().is_empty());
}

#[test]
fn test_unknown_key_is_reported() {
    let ctx = TestContext::new();

    let err = ctx.storefront.cart().set_quantity("1_42", 2).unwrap_err();

    assert!(matches!(err, AppError::Cart(CartError::LineNotFound(_))));
}

// ===== Events =====

#[test]
fn test_each_successful_write_publishes_one_event() {
    let mut ctx = TestContext::new();
    let cart = ctx.storefront.cart().clone();

    cart.add(&red_roses()).unwrap();
    cart.add(&red_roses()).unwrap();
    cart.add(&red_roses().with_quantity(0)).unwrap_err();
    cart.clear().unwrap();

    assert_eq!(
        ctx.drain_events(),
        vec![
            StoreEvent::CartChanged { item_count: 1 },
            StoreEvent::CartChanged { item_count: 2 },
            StoreEvent::CartChanged { item_count: 0 },
        ]
    );
}

#[test]
fn test_favorites_publish_their_own_events() {
    let mut ctx = TestContext::new();
    let favorites = ctx.storefront.favorites().clone();
    let id = ProductId::from(3);

    assert!(favorites.toggle(&id).unwrap());
    assert!(!favorites.toggle(&id).unwrap());

    assert_eq!(
        ctx.drain_events(),
        vec![
            StoreEvent::FavoritesChanged { count: 1 },
            StoreEvent::FavoritesChanged { count: 0 },
        ]
    );
}
