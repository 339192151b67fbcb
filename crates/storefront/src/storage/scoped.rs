//! Key-prefixing storage wrapper.

use super::{KeyValueStorage, StorageError};

/// Prefixes every key with `{scope}.` before delegating.
///
/// Lets several storefronts (or test runs) share one backend without
/// clobbering each other's carts.
#[derive(Debug)]
pub struct ScopedStorage<S> {
    scope: String,
    inner: S,
}

impl<S: KeyValueStorage> ScopedStorage<S> {
    /// Wrap `inner`, prefixing keys with `scope`.
    pub fn new(scope: impl Into<String>, inner: S) -> Self {
        Self {
            scope: scope.into(),
            inner,
        }
    }

    /// The key prefix.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The wrapped backend.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}.{key}", self.scope)
    }
}

impl<S: KeyValueStorage> KeyValueStorage for ScopedStorage<S> {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_raw(&self.scoped(key))
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_raw(&self.scoped(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(&self.scoped(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_keys_are_prefixed() {
        let storage = ScopedStorage::new("shop", MemoryStorage::new());
        storage.set_raw("cart", "[]").unwrap();

        assert_eq!(storage.inner().get_raw("shop.cart").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.inner().get_raw("cart").unwrap(), None);
        assert_eq!(storage.get_raw("cart").unwrap().as_deref(), Some("[]"));

        storage.remove("cart").unwrap();
        assert!(storage.inner().is_empty());
    }
}
