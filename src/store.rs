//! In-memory key-value store implementation with thread-safe access
//!
//! Values are serialized on the way in and deserialized on the way out; the
//! map itself only ever holds encoded bytes.

use crate::config::StoreConfig;
use crate::error::Result;
use crate::format::MarshalFormat;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Trait defining the interface for key-value storage operations
pub trait Store: Send + Sync {
    /// Store the encoded form of `value` under `key`, replacing any prior value.
    /// The old value survives if encoding fails.
    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()>;

    /// Get and decode the value for `key`, `None` if absent
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;

    /// Decode the value for `key` into `out`.
    ///
    /// Returns `Ok(false)` and leaves `out` alone when the key is absent.
    /// `out` is only written after a successful decode, so on a decode error
    /// it still holds whatever the caller put there.
    fn get_into<T: DeserializeOwned>(&self, key: &str, out: &mut T) -> Result<bool> {
        match self.get(key)? {
            Some(value) => {
                *out = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Release any resources held by the store
    fn close(&self) -> Result<()>;
}

/// Thread-safe in-memory key-value store
pub struct MemoryStore {
    data: Arc<DashMap<String, Arc<[u8]>>>,
    format: MarshalFormat,
}

impl MemoryStore {
    /// Create an empty store with the given configuration
    pub fn new(config: StoreConfig) -> Self {
        debug!(format = %config.marshal_format, "creating memory store");
        Self {
            data: Arc::new(DashMap::new()),
            format: config.marshal_format,
        }
    }

    /// Format every value in this store is encoded with
    pub fn marshal_format(&self) -> &MarshalFormat {
        &self.format
    }

    /// Check if a key exists without decoding it
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when no entries are stored
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sorted snapshot of the current keys
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Remove all entries
    pub fn clear(&self) {
        debug!(entries = self.data.len(), "clearing memory store");
        self.data.clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            format: self.format.clone(),
        }
    }
}

impl Store for MemoryStore {
    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = self.format.encode(value)?;
        trace!(key, bytes = bytes.len(), "set");
        self.data.insert(key.to_string(), Arc::from(bytes));
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.format.ensure_supported()?;

        // Clone the payload handle so decoding runs outside the shard lock
        let bytes = match self.data.get(key) {
            Some(entry) => Arc::clone(entry.value()),
            None => {
                trace!(key, "get miss");
                return Ok(None);
            }
        };

        trace!(key, bytes = bytes.len(), "get hit");
        self.format.decode(&bytes).map(Some)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let removed = self.data.remove(key).is_some();
        trace!(key, removed, "delete");
        Ok(())
    }

    fn close(&self) -> Result<()> {
        debug!(entries = self.data.len(), "closing memory store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncVaultError;

    fn bincode_store() -> MemoryStore {
        MemoryStore::new(StoreConfig::default().with_marshal_format(MarshalFormat::Bincode))
    }

    #[test]
    fn test_memory_store_basic_operations() {
        let store = MemoryStore::default();

        store.set("key1", "value1").unwrap();
        let result: Option<String> = store.get("key1").unwrap();
        assert_eq!(result, Some("value1".to_string()));

        assert!(store.contains_key("key1"));
        assert!(!store.contains_key("nonexistent"));

        store.delete("key1").unwrap();
        store.delete("key1").unwrap();

        let result: Option<String> = store.get("key1").unwrap();
        assert_eq!(result, None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_values_are_stored_encoded() {
        let store = MemoryStore::default();
        store.set("n", &42u32).unwrap();

        let raw = store.data.get("n").map(|entry| entry.value().to_vec());
        assert_eq!(raw, Some(b"42".to_vec()));

        let store = bincode_store();
        store.set("n", &42u32).unwrap();

        let raw = store.data.get("n").map(|entry| entry.value().to_vec());
        assert_eq!(raw, Some(42u32.to_le_bytes().to_vec()));
    }

    #[test]
    fn test_empty_key_is_valid() {
        let store = bincode_store();
        store.set("", &vec![1i64, -2, 3]).unwrap();

        let result: Option<Vec<i64>> = store.get("").unwrap();
        assert_eq!(result, Some(vec![1, -2, 3]));
        assert_eq!(store.keys(), vec![String::new()]);
    }

    #[test]
    fn test_decode_into_incompatible_shape() {
        let store = MemoryStore::default();
        store.set("word", "hello").unwrap();

        let err = store.get::<u32>("word").unwrap_err();
        assert!(matches!(err, SyncVaultError::Decode(_)));

        // Bytes are left in place for a correctly typed reader
        let word: Option<String> = store.get("word").unwrap();
        assert_eq!(word.as_deref(), Some("hello"));
    }

    #[test]
    fn test_get_into_keeps_destination_on_error() {
        let store = bincode_store();
        store.set("small", &1u8).unwrap();

        let mut out = 99u64;
        assert!(store.get_into("small", &mut out).is_err());
        assert_eq!(out, 99);

        assert!(!store.get_into("missing", &mut out).unwrap());
        assert_eq!(out, 99);
    }

    #[test]
    fn test_unsupported_format_leaves_map_untouched() {
        let store = MemoryStore::new(StoreConfig::default().with_marshal_format("gob"));

        assert!(store.set("a", &1).unwrap_err().is_configuration());
        assert!(store.get::<i32>("a").unwrap_err().is_configuration());
        assert!(store.is_empty());

        // Delete and close do not depend on the format
        store.delete("a").unwrap();
        store.close().unwrap();
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::default();
        let handle = store.clone();

        handle.set("shared", &true).unwrap();
        assert_eq!(store.get::<bool>("shared").unwrap(), Some(true));

        store.clear();
        assert!(handle.is_empty());
    }

    #[test]
    fn test_keys_are_sorted() {
        let store = MemoryStore::default();
        for key in ["b", "c", "a"] {
            store.set(key, key).unwrap();
        }

        assert_eq!(store.keys(), vec!["a", "b", "c"]);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_access() {
        let store = Arc::new(bincode_store());
        let mut handles = vec![];

        for i in 0..10 {
            let store_clone = Arc::clone(&store);
            let handle = tokio::spawn(async move {
                let key = format!("key{}", i);
                let value = format!("value{}", i);
                store_clone.set(&key, &value).unwrap();
                let result: Option<String> = store_clone.get(&key).unwrap();
                assert_eq!(result, Some(value));
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len(), 10);
    }
}
