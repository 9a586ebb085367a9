//! Wallet core for Pocket.
//!
//! Provides everything a wallet front end needs:
//! - PIN-encrypted storage of the secret key ([`SecretStore`])
//! - Sessions holding the unlocked key in memory only ([`Session`])
//! - Account state derived from the ledger ([`AccountStateMachine`])
//! - Validated real and simulated payments ([`PaymentOrchestrator`])
//! - The [`Wallet`] facade tying them together

pub mod account;
pub mod config;
pub mod error;
pub mod payment;
pub mod receipt;
pub mod secret_store;
pub mod session;
pub mod settings;
pub mod simulator;
mod submitter;
pub mod wallet;

pub use account::{AccountSnapshot, AccountState, AccountStateMachine};
pub use config::{DemoConfig, KdfConfig, WalletConfig};
pub use error::WalletError;
pub use payment::{
    validate_payment, AddressPolicy, PaymentOrchestrator, PaymentRequest, SendAttempt, SendPhase,
    ValidatedPayment,
};
pub use receipt::{Receipt, TransactionSummary};
pub use secret_store::{open_blob, KdfParams, SecretStore, WalletRecord};
pub use session::{Session, UnlockedKeypair};
pub use settings::{Settings, SettingsStore};
pub use simulator::SimulatedExecutor;
pub use wallet::{CreatedWallet, Wallet};
