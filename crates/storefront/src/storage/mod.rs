//! Key-value storage the stores persist into.
//!
//! Mirrors browser local storage: flat string keys mapping to JSON documents,
//! each write fully replacing the previous value.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - in-process map, for tests and throwaway sessions
//! - [`FileStorage`] - one JSON file per key under a data directory
//! - [`ScopedStorage`] - wraps any backend and prefixes every key
//!
//! Reads never fail on bad data: [`StorageExt::get_or`] falls back to the
//! supplied default when a value is missing, unreadable or of the wrong shape,
//! and [`StorageExt::get_list`] drops only the entries it cannot parse.

mod file;
mod memory;
mod scoped;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use scoped::ScopedStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// The cart's list of lines.
    pub const CART: &str = "cart";
    /// Favorite product ids.
    pub const FAVORITES: &str = "favorites";
    /// Placed orders, newest first.
    pub const ORDERS: &str = "orders";
    /// The signed-in session.
    pub const AUTH_SESSION: &str = "auth_session";
}

/// Errors that can occur when writing to storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Key contains characters the backend cannot store.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// A previous writer panicked while holding the lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A get/set/remove store of raw JSON strings.
pub trait KeyValueStorage: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed helpers over any [`KeyValueStorage`].
pub trait StorageExt: KeyValueStorage {
    /// Read and parse the value under `key`, or `default` if it is missing,
    /// unreadable or malformed.
    fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get_value(key) {
            Value::Null => default,
            value => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(key, error = %e, "Stored value has unexpected shape, using default");
                default
            }),
        }
    }

    /// Read the list under `key`, parsing each entry on its own.
    ///
    /// Entries that do not parse as `T` are dropped and the rest kept, so one
    /// bad entry never hides the whole list. Anything other than a list reads
    /// as empty.
    fn get_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.get_value(key) {
            Value::Null => Vec::new(),
            Value::Array(entries) => entries
                .into_iter()
                .enumerate()
                .filter_map(|(index, entry)| {
                    serde_json::from_value(entry)
                        .inspect_err(|e| {
                            tracing::warn!(key, index, error = %e, "Dropping unreadable entry");
                        })
                        .ok()
                })
                .collect(),
            other => {
                tracing::warn!(
                    key,
                    kind = %json_kind(&other),
                    "Stored value is not a list, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Read the value under `key` as untyped JSON, `Value::Null` if it is
    /// missing, unreadable or not JSON.
    fn get_value(&self, key: &str) -> Value {
        let raw = match self.get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Value::Null,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read stored value");
                return Value::Null;
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Stored value is not valid JSON");
            Value::Null
        })
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw)
    }
}

impl<S: KeyValueStorage + ?Sized> StorageExt for S {}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_get_or_missing_returns_default() {
        let storage = MemoryStorage::new();
        let value: Vec<u32> = storage.get_or("missing", vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn test_get_or_malformed_json_returns_default() {
        let storage = MemoryStorage::new();
        storage.set_raw("cart", "{not json").unwrap();
        let value: Vec<u32> = storage.get_or("cart", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_get_or_wrong_shape_returns_default() {
        let storage = MemoryStorage::new();
        storage.set("cart", &json!({"lines": []})).unwrap();
        let value: Vec<u32> = storage.get_or("cart", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_get_list_drops_only_bad_entries() {
        let storage = MemoryStorage::new();
        storage.set("favorites", &json!([1, "two", {"x": 3}, 4])).unwrap();
        let value: Vec<u32> = storage.get_list("favorites");
        assert_eq!(value, vec![1, 4]);
    }

    #[test]
    fn test_get_list_non_list_reads_empty() {
        let storage = MemoryStorage::new();
        storage.set("favorites", &json!({"ids": [1]})).unwrap();
        assert!(storage.get_list::<u32>("favorites").is_empty());
        assert!(storage.get_list::<u32>("missing").is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let storage = MemoryStorage::new();
        storage.set("favorites", &vec![1, 2, 3]).unwrap();
        let value: Vec<u32> = storage.get_or("favorites", Vec::new());
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_set_replaces_previous_value() {
        let storage = MemoryStorage::new();
        storage.set("favorites", &vec![1, 2, 3]).unwrap();
        storage.set("favorites", &vec![4]).unwrap();
        assert_eq!(storage.get_value("favorites"), json!([4]));
    }

    #[test]
    fn test_works_through_trait_object() {
        let storage: Box<dyn KeyValueStorage> = Box::new(MemoryStorage::new());
        storage.set("k", &true).unwrap();
        assert!(storage.get_or("k", false));
        storage.remove("k").unwrap();
        assert_eq!(storage.get_value("k"), Value::Null);
    }
}
