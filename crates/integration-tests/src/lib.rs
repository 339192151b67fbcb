//! Integration tests for Bouquet.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bouquet-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Adding, merging and editing cart lines through the stores
//! - `checkout_flow` - Login, checkout and order history
//! - `persistence` - State surviving a restart on file storage
//!
//! Every test builds its own [`TestContext`]; nothing touches the network.

#![cfg_attr(not(test), forbid(unsafe_code))]

use bouquet_storefront::Storefront;
use bouquet_storefront::config::StorefrontConfig;
use bouquet_storefront::events::StoreEvent;
use tempfile::TempDir;
use tokio::sync::broadcast::Receiver;

/// A storefront over a throwaway data directory.
pub struct TestContext {
    pub storefront: Storefront,
    pub events: Receiver<StoreEvent>,
    pub config: StorefrontConfig,
    // Removed with the context
    _data_dir: TempDir,
}

impl TestContext {
    /// Open a storefront in a fresh temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("create temp dir");
        let config = StorefrontConfig {
            data_dir: data_dir.path().to_path_buf(),
            ..StorefrontConfig::default()
        };
        let storefront = Storefront::open(config.clone()).expect("open storefront");
        let events = storefront.events().subscribe();

        Self {
            storefront,
            events,
            config,
            _data_dir: data_dir,
        }
    }

    /// Open a second storefront over the same directory, as after a restart.
    ///
    /// # Panics
    ///
    /// Panics if the storage cannot be opened.
    #[must_use]
    pub fn reopen(&self) -> Storefront {
        Storefront::open(self.config.clone()).expect("reopen storefront")
    }

    /// Every event published since the last drain.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::iter::from_fn(|| self.events.try_recv().ok()).collect()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
