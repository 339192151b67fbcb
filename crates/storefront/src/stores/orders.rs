//! Mock checkout and order history.
//!
//! There is no payment backend: placing an order snapshots the cart into an
//! [`Order`], stores it locally and empties the cart.

use std::sync::{Arc, Mutex};

use bouquet_core::cart::CartLine;
use bouquet_core::{CurrencyCode, OrderId, OrderStatus, PhoneError, PhoneNumber, Price};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::DeliveryConfig;
use crate::error::Result;
use crate::events::{EventBus, StoreEvent};
use crate::storage::{KeyValueStorage, StorageError, StorageExt, keys};
use crate::stores::CartStore;

/// Errors that can occur during checkout or order management.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout was attempted with nothing in the cart.
    #[error("your cart is empty")]
    EmptyCart,

    /// A required checkout field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The recipient phone number is invalid.
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// The requested delivery date has already passed.
    #[error("delivery date {0} is in the past")]
    DeliveryDateInPast(NaiveDate),

    /// No order with that id exists.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The order has progressed too far to cancel.
    #[error("order cannot be cancelled once it is {status}")]
    NotCancellable {
        /// Status the order is in.
        status: OrderStatus,
    },
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
    /// Card payment; accepted without charging anything.
    Card,
}

/// Delivery and payment details entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDetails {
    pub recipient_name: String,
    pub phone: String,
    pub city: String,
    pub address: String,
    pub delivery_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gift_note: Option<String>,
    #[serde(default)]
    pub payment: PaymentMethod,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    pub recipient_name: String,
    pub phone: PhoneNumber,
    pub city: String,
    pub address: String,
    pub delivery_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gift_note: Option<String>,
    pub payment: PaymentMethod,
    pub lines: Vec<CartLine>,
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub total: Price,
}

impl Order {
    /// Number of items across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        bouquet_core::cart::cart_item_count(&self.lines)
    }
}

/// Order history persisted newest first.
#[derive(Clone)]
pub struct OrderStore {
    storage: Arc<dyn KeyValueStorage>,
    events: EventBus,
    currency: CurrencyCode,
    delivery: DeliveryConfig,
    write_lock: Arc<Mutex<()>>,
}

impl OrderStore {
    /// Create an order store over `storage`, publishing to `events`.
    #[must_use]
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        events: EventBus,
        currency: CurrencyCode,
        delivery: DeliveryConfig,
    ) -> Self {
        Self {
            storage,
            events,
            currency,
            delivery,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Place an order for everything in `cart` and empty it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty, a field is missing or invalid,
    /// or a write fails. Neither store changes on a validation error.
    #[instrument(skip(self, cart, details), fields(city = %details.city))]
    pub fn place_order(&self, cart: &CartStore, details: CheckoutDetails) -> Result<Order> {
        self.place_order_at(cart, details, Utc::now())
    }

    fn place_order_at(
        &self,
        cart: &CartStore,
        details: CheckoutDetails,
        now: DateTime<Utc>,
    ) -> Result<Order> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;

        let order = cart.checkout_with(
            |lines| Ok(self.build_order(lines, details, now)?),
            |order| {
                let mut history = self.history();
                history.insert(0, order.clone());
                self.storage.set(keys::ORDERS, &history)?;
                Ok(())
            },
        )?;

        self.events.publish(StoreEvent::OrdersChanged);
        info!(
            order_id = %order.id,
            items = order.item_count(),
            total = %order.total,
            "Placed order"
        );
        Ok(order)
    }

    /// All orders, newest first.
    ///
    /// Entries that cannot be read as orders are skipped; the rest are kept.
    #[must_use]
    pub fn history(&self) -> Vec<Order> {
        self.storage.get_list(keys::ORDERS)
    }

    /// Look up one order.
    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.history().into_iter().find(|order| order.id == id)
    }

    /// Cancel an order that has not started preparation.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist, can no longer be
    /// cancelled, or the write fails.
    #[instrument(skip(self))]
    pub fn cancel(&self, id: OrderId) -> Result<Order> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;

        let mut history = self.history();
        let order = history
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(OrderError::NotFound(id))?;

        if !order.status.is_cancellable() {
            return Err(OrderError::NotCancellable {
                status: order.status,
            }
            .into());
        }
        order.status = OrderStatus::Cancelled;
        let cancelled = order.clone();

        self.storage.set(keys::ORDERS, &history)?;
        self.events.publish(StoreEvent::OrdersChanged);
        info!(order_id = %id, "Cancelled order");
        Ok(cancelled)
    }

    fn build_order(
        &self,
        lines: &[CartLine],
        details: CheckoutDetails,
        now: DateTime<Utc>,
    ) -> std::result::Result<Order, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let recipient_name = required(&details.recipient_name, "recipient name")?;
        let city = required(&details.city, "city")?;
        let address = required(&details.address, "address")?;
        let phone = PhoneNumber::parse(&details.phone)?;

        if details.delivery_date < now.date_naive() {
            return Err(OrderError::DeliveryDateInPast(details.delivery_date));
        }

        let subtotal = bouquet_core::cart::cart_subtotal(lines, self.currency);
        let delivery_fee = Price::new(self.delivery.fee_for(subtotal.amount), self.currency);
        let total = Price::new(subtotal.amount + delivery_fee.amount, self.currency);

        Ok(Order {
            id: self.next_order_id(now),
            status: OrderStatus::Pending,
            placed_at: now,
            recipient_name,
            phone,
            city,
            address,
            delivery_date: details.delivery_date,
            gift_note: details
                .gift_note
                .map(|note| note.trim().to_string())
                .filter(|note| !note.is_empty()),
            payment: details.payment,
            lines: lines.to_vec(),
            subtotal,
            delivery_fee,
            total,
        })
    }

    /// Millisecond timestamp, bumped past every id already in the history.
    fn next_order_id(&self, now: DateTime<Utc>) -> OrderId {
        let newest = self
            .history()
            .iter()
            .map(|order| order.id.as_i64())
            .max()
            .unwrap_or(0);
        OrderId::new(now.timestamp_millis().max(newest.saturating_add(1)))
    }
}

fn required(value: &str, field: &'static str) -> std::result::Result<String, OrderError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(OrderError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use bouquet_core::ProductInput;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    use std::sync::atomic::{AtomicBool, Ordering};

    use serde_json::{Value, json};

    use super::*;
    use crate::error::AppError;
    use crate::storage::MemoryStorage;

    /// Memory storage whose writes to one key fail once `broken` is set.
    struct FlakyStorage {
        inner: MemoryStorage,
        key: &'static str,
        broken: AtomicBool,
    }

    impl FlakyStorage {
        fn new(key: &'static str) -> Self {
            Self {
                inner: MemoryStorage::new(),
                key,
                broken: AtomicBool::new(false),
            }
        }

        fn break_writes(&self) {
            self.broken.store(true, Ordering::SeqCst);
        }

        fn check(&self, key: &str) -> std::result::Result<(), StorageError> {
            if key == self.key && self.broken.load(Ordering::SeqCst) {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            Ok(())
        }
    }

    impl KeyValueStorage for FlakyStorage {
        fn get_raw(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.inner.get_raw(key)
        }

        fn set_raw(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
            self.check(key)?;
            self.inner.set_raw(key, value)
        }

        fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
            self.check(key)?;
            self.inner.remove(key)
        }
    }

    fn flaky_stores(key: &'static str) -> (OrderStore, CartStore, EventBus, Arc<FlakyStorage>) {
        let storage = Arc::new(FlakyStorage::new(key));
        let events = EventBus::new();
        let cart = CartStore::new(storage.clone(), events.clone(), CurrencyCode::SAR);
        let orders = OrderStore::new(
            storage.clone(),
            events.clone(),
            CurrencyCode::SAR,
            DeliveryConfig::default(),
        );
        (orders, cart, events, storage)
    }

    fn stores() -> (OrderStore, CartStore, EventBus) {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let events = EventBus::new();
        let cart = CartStore::new(storage.clone(), events.clone(), CurrencyCode::SAR);
        let orders = OrderStore::new(
            storage,
            events.clone(),
            CurrencyCode::SAR,
            DeliveryConfig::default(),
        );
        (orders, cart, events)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 9, 30, 0).unwrap()
    }

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            recipient_name: "نورة".to_string(),
            phone: "0501234567".to_string(),
            city: "الرياض".to_string(),
            address: "حي الملقا، شارع 12".to_string(),
            delivery_date: (now() + Duration::days(1)).date_naive(),
            gift_note: Some("  كل عام وأنتِ بخير ".to_string()),
            payment: PaymentMethod::CashOnDelivery,
        }
    }

    #[test]
    fn test_place_order_snapshots_and_clears_cart() {
        let (orders, cart, _) = stores();
        cart.add(&ProductInput::new(1).with_price(dec!(120)).with_quantity(2))
            .unwrap();

        let order = orders.place_order_at(&cart, details(), now()).unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.subtotal.amount, dec!(240));
        assert_eq!(order.delivery_fee.amount, dec!(25));
        assert_eq!(order.total.amount, dec!(265));
        assert_eq!(order.phone.as_str(), "+966501234567");
        assert_eq!(order.gift_note.as_deref(), Some("كل عام وأنتِ بخير"));
        assert!(cart.lines().is_empty());
        assert_eq!(orders.history(), vec![order]);
    }

    #[test]
    fn test_free_delivery_over_threshold() {
        let (orders, cart, _) = stores();
        cart.add(&ProductInput::new(1).with_price(dec!(300))).unwrap();

        let order = orders.place_order_at(&cart, details(), now()).unwrap();
        assert_eq!(order.delivery_fee.amount, dec!(0));
        assert_eq!(order.total.amount, dec!(300));
    }

    #[test]
    fn test_validation_failure_keeps_cart() {
        let (orders, cart, _) = stores();
        cart.add(&ProductInput::new(1).with_price(dec!(50))).unwrap();

        let mut bad = details();
        bad.city = "   ".to_string();
        let err = orders.place_order_at(&cart, bad, now()).unwrap_err();
        assert!(matches!(err, AppError::Order(OrderError::MissingField("city"))));

        let mut bad = details();
        bad.phone = "0112345678".to_string();
        let err = orders.place_order_at(&cart, bad, now()).unwrap_err();
        assert!(matches!(err, AppError::Order(OrderError::InvalidPhone(_))));

        let mut bad = details();
        bad.delivery_date = (now() - Duration::days(1)).date_naive();
        let err = orders.place_order_at(&cart, bad, now()).unwrap_err();
        assert!(matches!(err, AppError::Order(OrderError::DeliveryDateInPast(_))));

        assert_eq!(cart.item_count(), 1);
        assert!(orders.history().is_empty());
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let (orders, cart, _) = stores();
        let err = orders.place_order_at(&cart, details(), now()).unwrap_err();
        assert!(matches!(err, AppError::Order(OrderError::EmptyCart)));
    }

    #[test]
    fn test_ids_unique_within_one_millisecond() {
        let (orders, cart, _) = stores();

        cart.add(&ProductInput::new(1)).unwrap();
        let first = orders.place_order_at(&cart, details(), now()).unwrap();
        cart.add(&ProductInput::new(2)).unwrap();
        let second = orders.place_order_at(&cart, details(), now()).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.id.as_i64(), first.id.as_i64() + 1);

        let history = orders.history();
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
    }

    #[test]
    fn test_cancel_rules() {
        let (orders, cart, events) = stores();
        cart.add(&ProductInput::new(1)).unwrap();
        let order = orders.place_order_at(&cart, details(), now()).unwrap();
        let mut rx = events.subscribe();

        let cancelled = orders.cancel(order.id).unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(orders.get(order.id).unwrap().status, OrderStatus::Cancelled);
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::OrdersChanged);

        let err = orders.cancel(order.id).unwrap_err();
        assert!(matches!(
            err,
            AppError::Order(OrderError::NotCancellable {
                status: OrderStatus::Cancelled
            })
        ));

        let err = orders.cancel(OrderId::new(7)).unwrap_err();
        assert!(matches!(err, AppError::Order(OrderError::NotFound(_))));
    }

    #[test]
    fn test_failed_cart_clear_saves_no_order() {
        let (orders, cart, events, storage) = flaky_stores(keys::CART);
        cart.add(&ProductInput::new(1).with_price(dec!(80))).unwrap();
        storage.break_writes();
        let mut rx = events.subscribe();

        let err = orders.place_order_at(&cart, details(), now()).unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert!(orders.history().is_empty());
        assert_eq!(cart.item_count(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_failed_order_write_restores_cart() {
        let (orders, cart, events, storage) = flaky_stores(keys::ORDERS);
        cart.add(&ProductInput::new(1).with_price(dec!(80)).with_quantity(2))
            .unwrap();
        let before = cart.lines();
        storage.break_writes();
        let mut rx = events.subscribe();

        let err = orders.place_order_at(&cart, details(), now()).unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert!(orders.history().is_empty());
        assert_eq!(cart.lines(), before);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unreadable_order_does_not_erase_history() {
        let (orders, cart, _) = stores();
        cart.add(&ProductInput::new(1).with_price(dec!(80))).unwrap();
        let first = orders.place_order_at(&cart, details(), now()).unwrap();

        let mut stored = orders.storage.get_value(keys::ORDERS);
        if let Value::Array(entries) = &mut stored {
            entries.push(json!({"legacy": true}));
        }
        orders.storage.set(keys::ORDERS, &stored).unwrap();

        cart.add(&ProductInput::new(2).with_price(dec!(60))).unwrap();
        let second = orders.place_order_at(&cart, details(), now()).unwrap();

        let ids: Vec<OrderId> = orders.history().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
