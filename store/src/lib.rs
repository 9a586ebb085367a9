//! Abstract storage for the pocket wallet.
//!
//! The wallet persists a handful of string values under fixed keys. Every
//! backend (LMDB on disk, in-memory for tests) implements [`KeyValueStore`];
//! the rest of the codebase depends only on the trait.

pub mod error;
pub mod kv;

pub use error::StoreError;
pub use kv::KeyValueStore;
