//! Browser-local-storage-shaped key/value contracts and adapters.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Host service storing one raw JSON string per fixed key.
///
/// Saves replace the whole value for a key, so repeating or interrupting a save is harmless:
/// the last completed write wins.
pub trait KeyValueStore {
    /// Loads the raw JSON string stored under `key`.
    fn load_raw(&self, key: &str) -> Result<Option<String>, String>;

    /// Replaces the raw JSON string stored under `key`.
    fn save_raw(&self, key: &str, raw_json: &str) -> Result<(), String>;

    /// Deletes `key`. Deleting a missing key succeeds.
    fn delete(&self, key: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that keeps nothing, for hosts without storage.
pub struct NoopKeyValueStore;

impl KeyValueStore for NoopKeyValueStore {
    fn load_raw(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn save_raw(&self, _key: &str, _raw_json: &str) -> Result<(), String> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store. Clones share the same map.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Returns the stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self.inner.borrow().keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save_raw(&self, key: &str, raw_json: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and deserializes a typed value through a [`KeyValueStore`].
///
/// # Errors
///
/// Returns an error when the store fails or the stored text is not valid JSON for `T`.
pub fn load_json_with<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_raw(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw).map(Some).map_err(|e| e.to_string())
}

/// Serializes and saves a typed value through a [`KeyValueStore`].
///
/// # Errors
///
/// Returns an error when serialization or the store save fails.
pub fn save_json_with<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_raw(key, &raw)
}
