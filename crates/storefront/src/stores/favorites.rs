//! Favorites store.

use std::sync::{Arc, Mutex};

use bouquet_core::ProductId;
use tracing::{info, instrument};

use crate::error::Result;
use crate::events::{EventBus, StoreEvent};
use crate::storage::{KeyValueStorage, StorageError, StorageExt, keys};

/// Favorite products, in the order they were added.
#[derive(Clone)]
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStorage>,
    events: EventBus,
    write_lock: Arc<Mutex<()>>,
}

impl FavoritesStore {
    /// Create a favorites store over `storage`, publishing to `events`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, events: EventBus) -> Self {
        Self {
            storage,
            events,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Favorite product ids. Unreadable entries are skipped.
    #[must_use]
    pub fn list(&self) -> Vec<ProductId> {
        self.storage.get_list(keys::FAVORITES)
    }

    /// Whether `id` is a favorite.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.list().contains(id)
    }

    /// Add `id` if absent, remove it if present. Returns the new membership.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    #[instrument(skip(self))]
    pub fn toggle(&self, id: &ProductId) -> Result<bool> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;

        let mut favorites = self.list();
        let added = if let Some(pos) = favorites.iter().position(|f| f == id) {
            favorites.remove(pos);
            false
        } else {
            favorites.push(id.clone());
            true
        };

        self.commit(&favorites)?;
        info!(added, "Toggled favorite");
        Ok(added)
    }

    /// Remove `id`. Returns whether it was a favorite.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &ProductId) -> Result<bool> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;

        let mut favorites = self.list();
        let before = favorites.len();
        favorites.retain(|f| f != id);
        if favorites.len() == before {
            return Ok(false);
        }

        self.commit(&favorites)?;
        Ok(true)
    }

    /// Remove every favorite.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;

        self.storage.remove(keys::FAVORITES)?;
        self.events.publish(StoreEvent::FavoritesChanged { count: 0 });
        Ok(())
    }

    fn commit(&self, favorites: &[ProductId]) -> Result<()> {
        self.storage.set(keys::FAVORITES, favorites)?;
        self.events.publish(StoreEvent::FavoritesChanged {
            count: favorites.len(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> (FavoritesStore, Arc<MemoryStorage>, EventBus) {
        let storage = Arc::new(MemoryStorage::new());
        let events = EventBus::new();
        (
            FavoritesStore::new(storage.clone(), events.clone()),
            storage,
            events,
        )
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let (store, _, _) = store();
        let id = ProductId::Numeric(3);

        assert!(store.toggle(&id).unwrap());
        assert!(store.contains(&id));
        assert!(!store.toggle(&id).unwrap());
        assert!(!store.contains(&id));
    }

    #[test]
    fn test_keeps_insertion_order_and_mixed_ids() {
        let (store, _, _) = store();
        store.toggle(&ProductId::Numeric(2)).unwrap();
        store.toggle(&ProductId::from("custom-bouquet")).unwrap();
        store.toggle(&ProductId::Numeric(1)).unwrap();

        assert_eq!(
            store.list(),
            vec![
                ProductId::Numeric(2),
                ProductId::from("custom-bouquet"),
                ProductId::Numeric(1),
            ]
        );
    }

    #[test]
    fn test_remove_missing_does_not_write() {
        let (store, storage, events) = store();
        let mut rx = events.subscribe();

        assert!(!store.remove(&ProductId::Numeric(8)).unwrap());
        assert!(storage.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_malformed_storage_reads_empty() {
        let (store, storage, _) = store();
        storage.set_raw(keys::FAVORITES, "\"not a list\"").unwrap();
        assert!(store.list().is_empty());
        assert!(store.toggle(&ProductId::Numeric(1)).unwrap());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_clear_notifies() {
        let (store, _, events) = store();
        store.toggle(&ProductId::Numeric(1)).unwrap();
        let mut rx = events.subscribe();

        store.clear().unwrap();
        assert!(store.list().is_empty());
        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::FavoritesChanged { count: 0 }
        );
    }

    #[test]
    fn test_bad_entry_does_not_hide_the_rest() {
        let (store, storage, _) = store();
        storage
            .set(keys::FAVORITES, &json!([4, {"legacy": true}, "custom-bouquet", false]))
            .unwrap();

        assert_eq!(
            store.list(),
            vec![ProductId::Numeric(4), ProductId::from("custom-bouquet")]
        );

        store.toggle(&ProductId::Numeric(9)).unwrap();
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn test_clear_waits_for_pending_writes() {
        let (store, _, _) = store();
        store.toggle(&ProductId::Numeric(1)).unwrap();

        let guard = store.write_lock.lock().unwrap();
        let clearing = {
            let store = store.clone();
            thread::spawn(move || store.clear())
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!clearing.is_finished());
        assert_eq!(store.list(), vec![ProductId::Numeric(1)]);

        drop(guard);
        clearing.join().unwrap().unwrap();
        assert!(store.list().is_empty());
    }
}
