//! Key-value store boundary.
//!
//! Hosts that already have a durable key-value namespace (mobile
//! preferences, an embedded settings table) can plug it in through
//! [`KeyValueStore`] instead of using the file store. The whole record is
//! kept under a single key as JSON, so the store's per-key atomicity is
//! enough to guarantee a reader never observes a half-written record.

use std::collections::HashMap;
use std::sync::Mutex;

use super::StateStore;
use crate::error::StorageError;
use crate::state::UsageState;

/// Key under which the serialized record is stored.
pub const STATE_KEY: &str = "rating.usage_state";

/// Minimal durable key-value interface required from the host.
///
/// `set` for a single key must be atomic; no cross-key guarantees are
/// required.
pub trait KeyValueStore {
    /// Read a value, `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove every key in the namespace.
    fn delete_all(&self) -> Result<(), StorageError>;
}

/// [`StateStore`] over any [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct KvStateStore<K> {
    kv: K,
}

impl<K: KeyValueStore> KvStateStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn into_inner(self) -> K {
        self.kv
    }
}

impl<K: KeyValueStore> StateStore for KvStateStore<K> {
    fn load(&self) -> Result<UsageState, StorageError> {
        match self.kv.get(STATE_KEY)? {
            None => Ok(UsageState::default()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| StorageError::ParseFailed(e.to_string()))
            }
        }
    }

    fn save(&self, state: &UsageState) -> Result<(), StorageError> {
        let raw = serde_json::to_string(state)
            .map_err(|e| StorageError::SerializeFailed(e.to_string()))?;
        self.kv.set(STATE_KEY, &raw)
    }

    fn reset(&self) -> Result<(), StorageError> {
        self.kv.delete_all()
    }
}

/// In-memory key-value store. Useful in tests and as a reference
/// implementation of the boundary.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::KeyValue {
            key: key.to_string(),
            message: "lock poisoned".to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::KeyValue {
            key: key.to_string(),
            message: "lock poisoned".to_string(),
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_all(&self) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::KeyValue {
            key: STATE_KEY.to_string(),
            message: "lock poisoned".to_string(),
        })?;
        entries.clear();
        Ok(())
    }
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for &K {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn delete_all(&self) -> Result<(), StorageError> {
        (**self).delete_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn load_from_empty_store_returns_zero_state() {
        let store = KvStateStore::new(MemoryKvStore::new());
        assert_eq!(store.load().unwrap(), UsageState::default());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let store = KvStateStore::new(MemoryKvStore::new());

        let mut state = UsageState::default();
        state.record_launch(Utc.with_ymd_and_hms(2026, 4, 2, 7, 30, 0).unwrap());
        state.record_launch(Utc.with_ymd_and_hms(2026, 4, 3, 7, 30, 0).unwrap());

        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn reset_clears_namespace_and_is_idempotent() {
        let store = KvStateStore::new(MemoryKvStore::new());
        let mut state = UsageState::default();
        state.record_launch(Utc::now());
        store.save(&state).unwrap();

        store.reset().unwrap();
        assert_eq!(store.load().unwrap(), UsageState::default());
        store.reset().unwrap();
        assert_eq!(store.load().unwrap(), UsageState::default());
    }

    #[test]
    fn corrupt_value_is_a_parse_error() {
        let kv = MemoryKvStore::new();
        kv.set(STATE_KEY, "{ definitely not json").unwrap();
        let store = KvStateStore::new(kv);
        assert!(matches!(store.load(), Err(StorageError::ParseFailed(_))));
    }
}
