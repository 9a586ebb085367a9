use async_trait::async_trait;
use pocket_types::AccountAddress;

use crate::types::{AccountRecord, Order, SubmitResponse, TransactionRecord};
use crate::LedgerError;

/// Read and write access to the ledger for one account at a time.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Load an account's balances, sequence and sub-entry count.
    ///
    /// An account that has never been funded yields [`LedgerError::NotFound`].
    async fn load_account(&self, account: &AccountAddress) -> Result<AccountRecord, LedgerError>;

    /// Submit a signed transaction envelope (base64 XDR).
    async fn submit_transaction(&self, envelope_xdr: &str) -> Result<SubmitResponse, LedgerError>;

    /// Most recent transactions touching `account`.
    async fn list_transactions(
        &self,
        account: &AccountAddress,
        limit: u32,
        order: Order,
    ) -> Result<Vec<TransactionRecord>, LedgerError>;

    /// Ask the test network's faucet to create and fund `account`.
    async fn fund_account(&self, account: &AccountAddress) -> Result<(), LedgerError>;
}
