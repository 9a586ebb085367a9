//! The wallet's view of the ledger network.
//!
//! [`LedgerClient`] is the only way wallet logic reaches the network.
//! [`HorizonClient`] implements it over the Horizon REST API; tests use the
//! in-memory `NullLedger` from `pocket-nullables`.
//!
//! Submission rejections are classified into [`SubmitFailure`] in the
//! [`failure`] module so callers never inspect raw response text.

pub mod client;
pub mod error;
pub mod failure;
pub mod horizon;
pub mod types;

pub use client::LedgerClient;
pub use error::LedgerError;
pub use failure::SubmitFailure;
pub use horizon::HorizonClient;
pub use types::{AccountRecord, BalanceLine, Order, SubmitResponse, TransactionRecord};
