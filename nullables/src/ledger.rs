//! Nullable ledger: a scripted in-memory network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pocket_horizon::{
    AccountRecord, BalanceLine, LedgerClient, LedgerError, Order, SubmitFailure, SubmitResponse,
    TransactionRecord,
};
use pocket_types::{AccountAddress, Amount};

/// Balance the faucet gives a new account.
pub const FAUCET_GRANT: Amount = Amount::from_units(10_000);

#[derive(Default)]
struct State {
    accounts: HashMap<String, AccountRecord>,
    history: HashMap<String, Vec<TransactionRecord>>,
    load_failure: Option<LedgerError>,
    submit_outcomes: Vec<Result<(), LedgerError>>,
    submitted: Vec<String>,
    ledger: u32,
    latency: Option<Duration>,
}

/// A [`LedgerClient`] that answers from scripted state and counts calls.
///
/// Nothing is decoded from submitted envelopes: tests update account state
/// explicitly with [`NullLedger::set_account`] to model the effect of a
/// confirmed transaction.
#[derive(Default)]
pub struct NullLedger {
    state: Mutex<State>,
    load_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    list_calls: AtomicUsize,
    fund_calls: AtomicUsize,
}

impl NullLedger {
    pub fn new() -> Self {
        let ledger = Self::default();
        ledger.state.lock().unwrap().ledger = 1_000;
        ledger
    }

    /// Build an account record holding `native` plus the given trustlines.
    pub fn account(
        address: &AccountAddress,
        native: Amount,
        trustlines: Vec<BalanceLine>,
    ) -> AccountRecord {
        let subentries = trustlines.len() as u32;
        Self::account_with_subentries(address, native, trustlines, subentries)
    }

    /// Like [`NullLedger::account`], with an explicit sub-entry count for
    /// accounts that also own offers, signers or data entries.
    pub fn account_with_subentries(
        address: &AccountAddress,
        native: Amount,
        trustlines: Vec<BalanceLine>,
        subentry_count: u32,
    ) -> AccountRecord {
        let mut balances = trustlines;
        balances.push(BalanceLine::native(native));
        AccountRecord {
            account_id: address.to_string(),
            sequence: 100,
            subentry_count,
            balances,
        }
    }

    pub fn set_account(&self, record: AccountRecord) {
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(record.account_id.clone(), record);
    }

    pub fn remove_account(&self, address: &AccountAddress) {
        self.state.lock().unwrap().accounts.remove(address.as_str());
    }

    pub fn set_history(&self, address: &AccountAddress, records: Vec<TransactionRecord>) {
        self.state
            .lock()
            .unwrap()
            .history
            .insert(address.to_string(), records);
    }

    /// Make every `load_account`/`list_transactions` fail until cleared.
    pub fn fail_loads(&self, error: LedgerError) {
        self.state.lock().unwrap().load_failure = Some(error);
    }

    pub fn clear_load_failure(&self) {
        self.state.lock().unwrap().load_failure = None;
    }

    /// Queue the outcome of the next submission. Unqueued submissions succeed.
    pub fn reject_next_submit(&self, failure: SubmitFailure) {
        self.fail_next_submit(LedgerError::Rejected(failure));
    }

    pub fn fail_next_submit(&self, error: LedgerError) {
        self.state.lock().unwrap().submit_outcomes.push(Err(error));
    }

    /// Delay every call by `latency` (for timeout tests).
    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().unwrap().latency = Some(latency);
    }

    /// Envelopes received by `submit_transaction`, in order.
    pub fn submitted(&self) -> Vec<String> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn fund_calls(&self) -> usize {
        self.fund_calls.load(Ordering::SeqCst)
    }

    /// Total calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.load_calls() + self.submit_calls() + self.list_calls() + self.fund_calls()
    }

    async fn simulate_latency(&self) {
        let latency = self.state.lock().unwrap().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl LedgerClient for NullLedger {
    async fn load_account(&self, account: &AccountAddress) -> Result<AccountRecord, LedgerError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        let state = self.state.lock().unwrap();
        if let Some(err) = &state.load_failure {
            return Err(err.clone());
        }
        state
            .accounts
            .get(account.as_str())
            .cloned()
            .ok_or(LedgerError::NotFound)
    }

    async fn submit_transaction(&self, envelope_xdr: &str) -> Result<SubmitResponse, LedgerError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        let mut state = self.state.lock().unwrap();
        state.submitted.push(envelope_xdr.to_string());
        if !state.submit_outcomes.is_empty() {
            state.submit_outcomes.remove(0)?;
        }
        state.ledger += 1;
        let ledger = state.ledger;
        Ok(SubmitResponse {
            hash: format!("{:064x}", state.submitted.len()),
            ledger,
            successful: true,
        })
    }

    async fn list_transactions(
        &self,
        account: &AccountAddress,
        limit: u32,
        order: Order,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        let state = self.state.lock().unwrap();
        if let Some(err) = &state.load_failure {
            return Err(err.clone());
        }
        let mut records = state.history.get(account.as_str()).cloned().unwrap_or_default();
        if order == Order::Asc {
            records.reverse();
        }
        records.truncate(limit as usize);
        Ok(records)
    }

    async fn fund_account(&self, account: &AccountAddress) -> Result<(), LedgerError> {
        self.fund_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        let mut state = self.state.lock().unwrap();
        if state.accounts.contains_key(account.as_str()) {
            return Err(LedgerError::FundingRefused("account already funded".to_string()));
        }
        let record = Self::account(account, FAUCET_GRANT, Vec::new());
        state.accounts.insert(account.to_string(), record);
        Ok(())
    }
}
