//! Storefront state shared across surfaces.

use std::sync::Arc;

use crate::catalog::{Catalog, RemoteCatalogClient};
use crate::config::StorefrontConfig;
use crate::events::EventBus;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage, ScopedStorage, StorageError};
use crate::stores::{AuthStore, CartStore, FavoritesStore, OrderStore};

/// Every store over one storage backend and one event bus.
///
/// This struct is cheaply cloneable via `Arc`; all clones see the same stores.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    events: EventBus,
    catalog: Catalog,
    remote: RemoteCatalogClient,
    cart: CartStore,
    favorites: FavoritesStore,
    orders: OrderStore,
    auth: AuthStore,
}

impl Storefront {
    /// Open the storefront persisted under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open(config: StorefrontConfig) -> Result<Self, StorageError> {
        let files = FileStorage::open(&config.data_dir)?;
        let storage = ScopedStorage::new(config.storage_scope.clone(), files);
        tracing::info!(
            data_dir = %config.data_dir.display(),
            scope = %config.storage_scope,
            "Opened storefront storage"
        );
        Ok(Self::with_storage(config, Arc::new(storage)))
    }

    /// A storefront that forgets everything when dropped.
    #[must_use]
    pub fn in_memory(config: StorefrontConfig) -> Self {
        Self::with_storage(config, Arc::new(MemoryStorage::new()))
    }

    /// Build every store over `storage`.
    #[must_use]
    pub fn with_storage(config: StorefrontConfig, storage: Arc<dyn KeyValueStorage>) -> Self {
        let events = EventBus::new();

        let cart = CartStore::new(storage.clone(), events.clone(), config.currency);
        let favorites = FavoritesStore::new(storage.clone(), events.clone());
        let orders = OrderStore::new(
            storage.clone(),
            events.clone(),
            config.currency,
            config.delivery,
        );
        let auth = AuthStore::new(storage, events.clone(), config.auth.clone());
        let remote = RemoteCatalogClient::new(&config.catalog);

        Self {
            inner: Arc::new(StorefrontInner {
                config,
                events,
                catalog: Catalog::builtin(),
                remote,
                cart,
                favorites,
                orders,
                auth,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the change notification bus.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Get a reference to the built-in catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the demo product API client.
    #[must_use]
    pub fn remote(&self) -> &RemoteCatalogClient {
        &self.inner.remote
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.inner.favorites
    }

    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }

    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.inner.auth
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bouquet_core::ProductInput;

    use super::*;
    use crate::events::StoreEvent;

    #[test]
    fn test_stores_share_one_bus() {
        let storefront = Storefront::in_memory(StorefrontConfig::default());
        let mut rx = storefront.events().subscribe();

        storefront.cart().add(&ProductInput::new(1)).unwrap();
        storefront
            .favorites()
            .toggle(&bouquet_core::ProductId::Numeric(1))
            .unwrap();

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::CartChanged { item_count: 1 });
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::FavoritesChanged { count: 1 });
    }

    #[test]
    fn test_open_persists_under_scope() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorefrontConfig {
            data_dir: dir.path().to_path_buf(),
            ..StorefrontConfig::default()
        };

        Storefront::open(config.clone())
            .unwrap()
            .cart()
            .add(&ProductInput::new(3).with_size("large"))
            .unwrap();

        let reopened = Storefront::open(config).unwrap();
        assert_eq!(reopened.cart().item_count(), 1);
    }
}
