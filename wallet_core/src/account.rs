//! Account state derived from the ledger.
//!
//! The wallet never stores account state of its own. Every
//! [`AccountSnapshot`] is built from a live fetch, and the
//! [`AccountState`] is a pure function of the latest snapshot:
//!
//! ```text
//! Unfunded ──fund──▶ FundedNoTrustline ──add_trustline──▶ FundedWithTrustline
//! ```

use std::sync::Arc;
use std::time::Duration;

use pocket_horizon::{AccountRecord, LedgerClient, LedgerError, Order, SubmitFailure};
use pocket_transactions::{Memo, Operation, BASE_FEE};
use pocket_types::{AccountAddress, Amount, Asset, AssetKind, Clock, NetworkId};
use serde::{Deserialize, Serialize};

use crate::receipt::{Receipt, TransactionSummary};
use crate::session::UnlockedKeypair;
use crate::submitter::{bounded, Submitter};
use crate::WalletError;

/// Native balance locked per ledger entry (0.5 XLM).
pub const BASE_RESERVE: Amount = Amount::from_stroops(5_000_000);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountState {
    Unfunded,
    FundedNoTrustline,
    FundedWithTrustline,
}

/// Balances and recent activity as last fetched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub address: AccountAddress,
    pub exists: bool,
    pub native_balance: Amount,
    /// `None` when the account holds no trustline for the issued asset.
    pub issued_balance: Option<Amount>,
    pub has_issued_trustline: bool,
    pub trustline_count: u32,
    /// Ledger entries owned by the account (trustlines, offers, signers,
    /// data). Each one raises the minimum balance.
    pub subentry_count: u32,
    pub recent_transactions: Vec<TransactionSummary>,
}

impl AccountSnapshot {
    /// The view of an account that does not exist on the ledger yet.
    pub fn unfunded(address: AccountAddress) -> Self {
        Self {
            address,
            exists: false,
            native_balance: Amount::ZERO,
            issued_balance: None,
            has_issued_trustline: false,
            trustline_count: 0,
            subentry_count: 0,
            recent_transactions: Vec::new(),
        }
    }

    pub fn from_record(
        address: AccountAddress,
        record: &AccountRecord,
        issued: &Asset,
        recent_transactions: Vec<TransactionSummary>,
    ) -> Result<Self, LedgerError> {
        let mut native_balance = Amount::ZERO;
        let mut issued_balance = None;
        for line in &record.balances {
            let amount = line.amount().map_err(|e| {
                LedgerError::InvalidResponse(format!("balance {:?}: {e}", line.balance))
            })?;
            if line.is_native() {
                native_balance = amount;
            } else if line.is_asset(issued) {
                issued_balance = Some(amount);
            }
        }

        Ok(Self {
            address,
            exists: true,
            native_balance,
            has_issued_trustline: issued_balance.is_some(),
            issued_balance,
            trustline_count: record.trustline_count(),
            subentry_count: record.subentry_count.max(record.trustline_count()),
            recent_transactions,
        })
    }

    pub fn state(&self) -> AccountState {
        match (self.exists, self.has_issued_trustline) {
            (false, _) => AccountState::Unfunded,
            (true, false) => AccountState::FundedNoTrustline,
            (true, true) => AccountState::FundedWithTrustline,
        }
    }

    pub fn balance_of(&self, asset: AssetKind) -> Amount {
        match asset {
            AssetKind::Native => self.native_balance,
            AssetKind::Issued => self.issued_balance.unwrap_or(Amount::ZERO),
        }
    }

    /// Native balance needed to open one more trustline:
    /// `(2 + subentries + 1) × base reserve + base fee`.
    pub fn trustline_reserve_requirement(&self) -> Amount {
        let entries = 2 + i64::from(self.subentry_count) + 1;
        BASE_RESERVE
            .checked_mul(entries)
            .and_then(|reserve| reserve.checked_add(Amount::from_stroops(i64::from(BASE_FEE))))
            .unwrap_or(Amount::from_stroops(i64::MAX))
    }
}

/// Tracks one account's state and performs the trustline transitions.
pub struct AccountStateMachine {
    ledger: Arc<dyn LedgerClient>,
    submitter: Submitter,
    network: NetworkId,
    issued: Asset,
    timeout: Duration,
    history_limit: u32,
    snapshot: Option<AccountSnapshot>,
}

impl AccountStateMachine {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        clock: Arc<dyn Clock>,
        network: NetworkId,
        timeout: Duration,
        history_limit: u32,
    ) -> Self {
        Self {
            submitter: Submitter::new(ledger.clone(), clock, network, timeout),
            ledger,
            network,
            issued: network.issued_asset(),
            timeout,
            history_limit,
            snapshot: None,
        }
    }

    pub fn snapshot(&self) -> Option<&AccountSnapshot> {
        self.snapshot.as_ref()
    }

    /// Snapshot for `address`, if the last fetch was for that account.
    pub fn snapshot_for(&self, address: &AccountAddress) -> Option<&AccountSnapshot> {
        self.snapshot.as_ref().filter(|s| &s.address == address)
    }

    pub fn state(&self) -> Option<AccountState> {
        self.snapshot.as_ref().map(AccountSnapshot::state)
    }

    /// Forget the cached snapshot (on logout).
    pub fn reset(&mut self) {
        self.snapshot = None;
    }

    /// Refetch `address` from the ledger.
    ///
    /// A missing account yields an unfunded snapshot. On transport failure
    /// the previous snapshot stays in place and the error is returned.
    pub async fn refresh(&mut self, address: &AccountAddress) -> Result<&AccountSnapshot, WalletError> {
        match self.fetch(address).await {
            Ok(snapshot) => {
                if self.snapshot.as_ref() != Some(&snapshot) {
                    tracing::debug!(
                        address = %pocket_utils::short_id(address.as_str()),
                        state = ?snapshot.state(),
                        native = %snapshot.native_balance,
                        "account snapshot updated"
                    );
                }
                Ok(self.snapshot.insert(snapshot))
            }
            Err(e) => {
                tracing::warn!(error = %e, "refresh failed, keeping previous snapshot");
                Err(e.into())
            }
        }
    }

    async fn fetch(&self, address: &AccountAddress) -> Result<AccountSnapshot, LedgerError> {
        let record = match bounded(self.timeout, self.ledger.load_account(address)).await {
            Ok(record) => record,
            Err(LedgerError::NotFound) => return Ok(AccountSnapshot::unfunded(address.clone())),
            Err(e) => return Err(e),
        };
        let history = bounded(
            self.timeout,
            self.ledger
                .list_transactions(address, self.history_limit, Order::Desc),
        )
        .await?;
        let recent = history.into_iter().map(TransactionSummary::from).collect();
        AccountSnapshot::from_record(address.clone(), &record, &self.issued, recent)
    }

    /// Ask the test-network faucet to create the account, then refresh.
    pub async fn fund(&mut self, address: &AccountAddress) -> Result<&AccountSnapshot, WalletError> {
        if self.network == NetworkId::Main {
            return Err(WalletError::FundingUnavailable(
                "mainnet accounts must be funded by a transfer".to_string(),
            ));
        }
        bounded(self.timeout, self.ledger.fund_account(address)).await?;
        tracing::info!(address = %pocket_utils::short_id(address.as_str()), "account funded");
        self.refresh(address).await
    }

    async fn ensure_snapshot(&mut self, address: &AccountAddress) -> Result<(), WalletError> {
        if self.snapshot_for(address).is_none() {
            self.refresh(address).await?;
        }
        Ok(())
    }

    /// Open a trustline to the issued asset.
    pub async fn add_trustline(&mut self, signer: &UnlockedKeypair) -> Result<Receipt, WalletError> {
        let address = signer.address().clone();
        self.ensure_snapshot(&address).await?;
        let (needed, available) = match self.snapshot_for(&address) {
            Some(s) if s.has_issued_trustline => return Err(WalletError::AlreadyTrusted),
            Some(s) => (s.trustline_reserve_requirement(), s.native_balance),
            None => return Err(WalletError::AccountNotFound),
        };
        if available < needed {
            return Err(WalletError::InsufficientReserve { needed, available });
        }

        let receipt = self
            .submitter
            .submit(
                signer,
                Operation::add_trustline(self.issued.clone()),
                Memo::None,
                |failure| match failure {
                    SubmitFailure::Underfunded | SubmitFailure::LowReserve => {
                        WalletError::InsufficientReserve { needed, available }
                    }
                    other => WalletError::SubmissionFailed(other.to_string()),
                },
            )
            .await?;

        self.refresh_after_write(&address).await;
        Ok(receipt)
    }

    /// Close the issued-asset trustline. The trustline must be empty.
    pub async fn remove_trustline(&mut self, signer: &UnlockedKeypair) -> Result<Receipt, WalletError> {
        let address = signer.address().clone();
        self.ensure_snapshot(&address).await?;
        match self.snapshot_for(&address) {
            Some(s) if !s.has_issued_trustline => return Err(WalletError::TrustlineRequired),
            Some(s) => {
                let held = s.balance_of(AssetKind::Issued);
                if !held.is_zero() {
                    return Err(WalletError::TrustlineNotEmpty(held));
                }
            }
            None => return Err(WalletError::AccountNotFound),
        }

        let receipt = self
            .submitter
            .submit(
                signer,
                Operation::remove_trustline(self.issued.clone()),
                Memo::None,
                |failure| WalletError::SubmissionFailed(failure.to_string()),
            )
            .await?;

        self.refresh_after_write(&address).await;
        Ok(receipt)
    }

    /// A confirmed write already succeeded; a failed follow-up refresh is
    /// only logged.
    pub(crate) async fn refresh_after_write(&mut self, address: &AccountAddress) {
        if let Err(e) = self.refresh(address).await {
            tracing::warn!(error = %e, "post-submit refresh failed");
        }
    }
}
