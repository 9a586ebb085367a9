//! Key-value storage trait.

use crate::StoreError;

/// A small persistent string map.
///
/// Implementations must be safe to share across threads; every method takes
/// `&self` and serialises writes internally.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite a value.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Write several entries atomically: either all land or none do.
    fn put_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Remove several keys atomically.
    fn delete_all(&self, keys: &[&str]) -> Result<(), StoreError>;

    /// Whether a key is present.
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}
