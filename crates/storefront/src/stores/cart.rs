//! Cart store.
//!
//! Persists the cart under [`keys::CART`] as a flat list of lines. Every
//! mutation is a read → compute → write cycle run under one lock, with the
//! pure functions of [`bouquet_core::cart`] doing the compute step.

use std::sync::{Arc, Mutex, MutexGuard};

use bouquet_core::cart::{self, AddOutcome, CartLine, LineRef, ProductInput};
use bouquet_core::{CurrencyCode, Price};
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::events::{EventBus, StoreEvent};
use crate::storage::{KeyValueStorage, StorageError, StorageExt, keys};

/// The shopping cart.
#[derive(Clone)]
pub struct CartStore {
    storage: Arc<dyn KeyValueStorage>,
    events: EventBus,
    currency: CurrencyCode,
    write_lock: Arc<Mutex<()>>,
}

impl CartStore {
    /// Create a cart store over `storage`, publishing to `events`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, events: EventBus, currency: CurrencyCode) -> Self {
        Self {
            storage,
            events,
            currency,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Current cart lines.
    ///
    /// Malformed stored state reads as an empty cart; entries that are not
    /// cart lines are dropped.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.storage.get_list(keys::CART)
    }

    /// Add a product, merging with an existing line of the same configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing id or bad quantity, or a
    /// storage error if the write fails. Nothing is written on error.
    #[instrument(skip(self, input), fields(product_id = ?input.id))]
    pub fn add(&self, input: &ProductInput) -> Result<AddOutcome> {
        let _guard = self.lock()?;

        let outcome = cart::add_product_to_cart(&self.lines(), input)?;
        self.commit(&outcome.cart)?;

        if let Some(line) = outcome.line() {
            info!(
                unique_key = %line.effective_key(),
                quantity = line.quantity,
                is_new = outcome.is_new,
                "Added to cart"
            );
        }
        Ok(outcome)
    }

    /// Remove the lines selected by `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing matched or the write fails.
    #[instrument(skip(self))]
    pub fn remove(&self, target: &LineRef) -> Result<Vec<CartLine>> {
        let _guard = self.lock()?;

        let remaining = cart::remove_product(&self.lines(), target)?;
        self.commit(&remaining)?;

        info!(remaining = remaining.len(), "Removed from cart");
        Ok(remaining)
    }

    /// Set the quantity of the line with fingerprint `key`.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero quantity, an unknown key, or a failed write.
    #[instrument(skip(self))]
    pub fn set_quantity(&self, key: &str, quantity: u32) -> Result<Vec<CartLine>> {
        let _guard = self.lock()?;

        let updated = cart::update_quantity(&self.lines(), key, quantity)?;
        self.commit(&updated)?;

        info!(quantity, "Updated cart line quantity");
        Ok(updated)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock()?;

        self.commit(&[])?;
        info!("Cleared cart");
        Ok(())
    }

    /// Turn the current lines into a `T` with `build`, empty the cart, then
    /// save the result with `persist`.
    ///
    /// The cart stays locked throughout, so no add can slip in between the
    /// snapshot and the clear. If `build` fails nothing is written. If
    /// `persist` fails the cart is written back as it was. The cart-changed
    /// event is published only once both writes have succeeded.
    ///
    /// # Errors
    ///
    /// Returns the error from `build` or `persist`, or a storage error if
    /// clearing the cart fails.
    pub fn checkout_with<T>(
        &self,
        build: impl FnOnce(&[CartLine]) -> Result<T>,
        persist: impl FnOnce(&T) -> Result<()>,
    ) -> Result<T> {
        let _guard = self.lock()?;

        let lines = self.lines();
        let value = build(&lines)?;

        self.storage.set(keys::CART, &[] as &[CartLine])?;
        if let Err(e) = persist(&value) {
            if let Err(restore) = self.storage.set(keys::CART, &lines) {
                error!(error = %restore, "Failed to restore cart after checkout error");
            }
            return Err(e);
        }

        self.events.publish(StoreEvent::CartChanged { item_count: 0 });
        Ok(value)
    }

    /// Total number of items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        cart::cart_item_count(&self.lines())
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        cart::cart_subtotal(&self.lines(), self.currency)
    }

    /// Currency the cart is priced in.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    fn lock(&self) -> std::result::Result<MutexGuard<'_, ()>, StorageError> {
        self.write_lock.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Persist `lines` and announce the change.
    fn commit(&self, lines: &[CartLine]) -> Result<()> {
        self.storage.set(keys::CART, lines)?;
        self.events.publish(StoreEvent::CartChanged {
            item_count: cart::cart_item_count(lines),
        });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use bouquet_core::ProductId;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tokio::sync::broadcast::Receiver;

    use super::*;
    use crate::error::AppError;
    use crate::storage::MemoryStorage;

    fn store() -> (CartStore, Arc<MemoryStorage>, Receiver<StoreEvent>) {
        let storage = Arc::new(MemoryStorage::new());
        let events = EventBus::new();
        let rx = events.subscribe();
        let store = CartStore::new(storage.clone(), events, CurrencyCode::SAR);
        (store, storage, rx)
    }

    fn drain(rx: &mut Receiver<StoreEvent>) -> Vec<StoreEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn test_add_persists_and_notifies_once() {
        let (store, storage, mut rx) = store();

        let outcome = store.add(&ProductInput::new(10).with_price(dec!(150))).unwrap();
        assert!(outcome.is_new);

        let persisted = storage.get_value(keys::CART);
        assert_eq!(persisted.as_array().unwrap().len(), 1);
        assert_eq!(persisted[0]["id"], 10);
        assert_eq!(drain(&mut rx), vec![StoreEvent::CartChanged { item_count: 1 }]);
    }

    #[test]
    fn test_merge_updates_persisted_quantity() {
        let (store, _, mut rx) = store();

        store.add(&ProductInput::new(10).with_size("medium")).unwrap();
        let outcome = store
            .add(&ProductInput::new(10).with_size("medium").with_quantity(2))
            .unwrap();

        assert!(!outcome.is_new);
        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.lines()[0].quantity, 3);
        assert_eq!(
            drain(&mut rx),
            vec![
                StoreEvent::CartChanged { item_count: 1 },
                StoreEvent::CartChanged { item_count: 3 },
            ]
        );
    }

    #[test]
    fn test_failed_add_writes_nothing_and_stays_silent() {
        let (store, storage, mut rx) = store();
        store.add(&ProductInput::new(1)).unwrap();
        drain(&mut rx);
        let before = storage.get_raw(keys::CART).unwrap();

        let bad = ProductInput::from_value(json!({"id": 1, "quantity": 1.5})).unwrap();
        let err = store.add(&bad).unwrap_err();
        assert!(matches!(err, AppError::Cart(_)));

        assert_eq!(storage.get_raw(keys::CART).unwrap(), before);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_corrupted_storage_reads_as_empty() {
        let (store, storage, _) = store();

        storage.set_raw(keys::CART, "{oops").unwrap();
        assert!(store.lines().is_empty());

        storage.set(keys::CART, &json!({"id": 1})).unwrap();
        assert!(store.lines().is_empty());

        // Recovers by overwriting on the next add
        store.add(&ProductInput::new(2)).unwrap();
        assert_eq!(store.lines().len(), 1);
    }

    #[test]
    fn test_unreadable_entries_are_dropped() {
        let (store, storage, _) = store();
        storage
            .set(keys::CART, &json!([{"id": 5, "size": "medium"}, {"no": "id"}]))
            .unwrap();

        let lines = store.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].id, ProductId::Numeric(5));
    }

    #[test]
    fn test_legacy_line_merges() {
        let (store, storage, _) = store();
        storage
            .set(keys::CART, &json!([{"id": 5, "size": "medium", "quantity": 1}]))
            .unwrap();

        let outcome = store.add(&ProductInput::new(5).with_size("medium")).unwrap();
        assert!(!outcome.is_new);
        assert_eq!(store.item_count(), 2);
    }

    #[test]
    fn test_remove_set_quantity_and_clear() {
        let (store, _, mut rx) = store();
        let key = store
            .add(&ProductInput::new(1).with_price(dec!(20)))
            .unwrap()
            .line()
            .unwrap()
            .effective_key();
        store.add(&ProductInput::new(2).with_price(dec!(5))).unwrap();

        store.set_quantity(&key, 4).unwrap();
        assert_eq!(store.subtotal(), Price::new(dec!(85), CurrencyCode::SAR));

        store.remove(&LineRef::Key(key)).unwrap();
        assert_eq!(store.item_count(), 1);

        assert!(store.remove(&LineRef::Product(ProductId::Numeric(99))).is_err());

        store.clear().unwrap();
        assert!(store.lines().is_empty());

        let events = drain(&mut rx);
        assert_eq!(events.len(), 5);
        assert_eq!(events.last(), Some(&StoreEvent::CartChanged { item_count: 0 }));
    }

    #[test]
    fn test_concurrent_adds_merge_into_one_line() {
        const THREADS: u32 = 16;
        let (store, _, mut rx) = store();
        let input = ProductInput::new(3).with_price(dec!(40)).with_color("white");

        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| store.add(&input).unwrap());
            }
        });

        let lines = store.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, THREADS);
        assert_eq!(
            lines[0].unique_key.as_deref(),
            Some(lines[0].effective_key().as_str())
        );

        // Each write publishes while still holding the lock, so counts arrive in order
        let expected: Vec<StoreEvent> = (1..=THREADS)
            .map(|item_count| StoreEvent::CartChanged { item_count })
            .collect();
        assert_eq!(drain(&mut rx), expected);
    }
}
