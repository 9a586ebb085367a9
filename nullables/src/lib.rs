//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the wallet (clock, ledger network, storage)
//! sits behind a trait. This crate provides implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod ledger;
pub mod store;

pub use clock::NullClock;
pub use ledger::{NullLedger, FAUCET_GRANT};
pub use store::NullStore;
