//! LMDB environment and the wallet database.

use std::path::Path;

use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions};
use pocket_store::{KeyValueStore, StoreError};

use crate::LmdbError;

/// Map size for the wallet environment. The wallet stores a few kilobytes;
/// LMDB only reserves address space for this, not disk.
const DEFAULT_MAP_SIZE: usize = 16 * 1024 * 1024;

const WALLET_DB: &str = "wallet";

/// A [`KeyValueStore`] backed by one LMDB database.
#[derive(Clone)]
pub struct LmdbStore {
    env: Env,
    db: Database<Str, Str>,
}

impl LmdbStore {
    /// Open or create the store under `dir`.
    pub fn open(dir: &Path) -> Result<Self, LmdbError> {
        Self::open_with_map_size(dir, DEFAULT_MAP_SIZE)
    }

    pub fn open_with_map_size(dir: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(dir)?;
        // SAFETY: the environment is opened once per directory by this
        // process and the files are not modified by anything else.
        let env = unsafe { EnvOpenOptions::new().map_size(map_size).max_dbs(1).open(dir)? };
        let mut wtxn = env.write_txn()?;
        let db: Database<Str, Str> = env.create_database(&mut wtxn, Some(WALLET_DB))?;
        wtxn.commit()?;
        tracing::debug!(path = %dir.display(), "opened wallet store");
        Ok(Self { env, db })
    }
}

impl KeyValueStore for LmdbStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let value = self
            .db
            .get(&rtxn, key)
            .map_err(|_| StoreError::Encoding(key.to_string()))?;
        Ok(value.map(str::to_string))
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put_all(&[(key, value)])
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.delete_all(&[key])
    }

    fn put_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for &(key, value) in entries {
            self.db
                .put(&mut wtxn, key, value)
                .map_err(|e| StoreError::WriteRejected(e.to_string()))?;
        }
        wtxn
            .commit()
            .map_err(|e| StoreError::WriteRejected(e.to_string()))?;
        Ok(())
    }

    fn delete_all(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for &key in keys {
            self.db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, LmdbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn put_get_delete() {
        let (_dir, store) = open_temp();
        assert_eq!(store.get("k").unwrap(), None);
        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert!(store.contains("k").unwrap());
        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn delete_absent_key_is_ok() {
        let (_dir, store) = open_temp();
        store.delete("missing").unwrap();
        store.delete_all(&["a", "b"]).unwrap();
    }

    #[test]
    fn put_all_and_delete_all() {
        let (_dir, store) = open_temp();
        store.put_all(&[("a", "1"), ("b", "2"), ("c", "3")]).unwrap();
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
        store.delete_all(&["a", "b"]).unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("c").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn overwrite_replaces_value() {
        let (_dir, store) = open_temp();
        store.put("k", "old").unwrap();
        store.put("k", "new").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = LmdbStore::open(dir.path()).unwrap();
            store.put("pocket_wallet_exists", "true").unwrap();
        }
        let store = LmdbStore::open(dir.path()).unwrap();
        assert_eq!(store.get("pocket_wallet_exists").unwrap().as_deref(), Some("true"));
    }
}
