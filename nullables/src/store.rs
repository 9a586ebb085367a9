//! Nullable store: thread-safe in-memory key-value storage for testing.

use pocket_store::{KeyValueStore, StoreError};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// An in-memory [`KeyValueStore`] whose writes can be made to fail.
#[derive(Debug, Default)]
pub struct NullStore {
    entries: Mutex<BTreeMap<String, String>>,
    fail_writes: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every `put`/`put_all` is rejected and nothing is written.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Insert a raw value, bypassing the write-failure switch.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// All keys currently present, in order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected("null store set to fail".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for NullStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put_all(&[(key, value)])
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.delete_all(&[key])
    }

    fn put_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut map = self.entries.lock().unwrap();
        for &(key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn delete_all(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut map = self.entries.lock().unwrap();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
