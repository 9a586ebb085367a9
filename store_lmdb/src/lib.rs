//! LMDB storage backend for the pocket wallet.
//!
//! Implements [`pocket_store::KeyValueStore`] using the `heed` LMDB bindings.
//! All wallet keys live in one named database inside a single environment.

pub mod environment;
pub mod error;

pub use environment::LmdbStore;
pub use error::LmdbError;
