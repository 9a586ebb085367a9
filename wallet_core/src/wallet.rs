//! The `Wallet` facade the UI talks to.
//!
//! Owns the secret store, the optional unlocked [`Session`], the account
//! state machine and the payment orchestrator. Every operation that can
//! change state takes `&mut self`, so at most one is in flight per wallet.

use std::fmt;
use std::sync::Arc;

use pocket_horizon::LedgerClient;
use pocket_store::KeyValueStore;
use pocket_types::{AccountAddress, Clock};

use crate::account::{AccountSnapshot, AccountStateMachine};
use crate::config::WalletConfig;
use crate::payment::{PaymentOrchestrator, PaymentRequest, SendAttempt};
use crate::receipt::{Receipt, TransactionSummary};
use crate::secret_store::{validate_pin, SecretStore, WalletRecord};
use crate::session::{Session, UnlockedKeypair};
use crate::settings::{Settings, SettingsStore};
use crate::simulator::SimulatedExecutor;
use crate::submitter::Submitter;
use crate::WalletError;

/// Result of creating a wallet. The words are shown once for backup.
pub struct CreatedWallet {
    pub public_key: AccountAddress,
    pub backup_phrase_words: Vec<String>,
}

impl fmt::Debug for CreatedWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatedWallet")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

pub struct Wallet {
    config: WalletConfig,
    clock: Arc<dyn Clock>,
    secrets: SecretStore,
    settings: SettingsStore,
    session: Option<Session>,
    account: AccountStateMachine,
    payments: PaymentOrchestrator,
    demo: Option<SimulatedExecutor>,
}

impl Wallet {
    pub fn new(
        config: WalletConfig,
        store: Arc<dyn KeyValueStore>,
        ledger: Arc<dyn LedgerClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let timeout = config.request_timeout();
        let submitter = Submitter::new(ledger.clone(), clock.clone(), config.network, timeout);
        Self {
            secrets: SecretStore::new(store.clone(), clock.clone(), config.kdf.into()),
            settings: SettingsStore::new(store),
            session: None,
            account: AccountStateMachine::new(
                ledger,
                clock.clone(),
                config.network,
                timeout,
                config.history_limit,
            ),
            payments: PaymentOrchestrator::new(submitter, config.network),
            demo: None,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    pub fn exists(&self) -> Result<bool, WalletError> {
        self.secrets.exists()
    }

    /// Address and creation time of the stored wallet, without unlocking.
    pub fn record(&self) -> Result<Option<WalletRecord>, WalletError> {
        self.secrets.record()
    }

    /// Generate a fresh key from a new backup phrase, store it under `pin`
    /// and start a session with it.
    pub fn create_wallet(&mut self, pin: &str) -> Result<CreatedWallet, WalletError> {
        validate_pin(pin)?;
        if self.secrets.exists()? {
            return Err(WalletError::WalletAlreadyExists);
        }
        let phrase = pocket_crypto::generate_mnemonic()
            .map_err(|e| WalletError::KeyGeneration(e.to_string()))?;
        let keypair = pocket_crypto::keypair_from_mnemonic(&phrase)
            .map_err(|e| WalletError::KeyGeneration(e.to_string()))?;

        let record = self.secrets.create(&keypair, pin)?;
        self.begin_session(UnlockedKeypair::new(keypair));

        Ok(CreatedWallet {
            public_key: record.public_key,
            backup_phrase_words: phrase.split_whitespace().map(str::to_string).collect(),
        })
    }

    /// Re-create the wallet from its backup phrase under a new `pin`.
    pub fn restore_wallet(&mut self, phrase: &str, pin: &str) -> Result<AccountAddress, WalletError> {
        validate_pin(pin)?;
        let keypair =
            pocket_crypto::keypair_from_mnemonic(phrase).map_err(|_| WalletError::InvalidBackupPhrase)?;
        let record = self.secrets.create(&keypair, pin)?;
        self.begin_session(UnlockedKeypair::new(keypair));
        tracing::info!(address = %pocket_utils::short_id(record.public_key.as_str()), "wallet restored");
        Ok(record.public_key)
    }

    pub fn unlock(&mut self, pin: &str) -> Result<&Session, WalletError> {
        let keypair = self.secrets.unlock(pin)?;
        Ok(self.begin_session(keypair))
    }

    fn begin_session(&mut self, keypair: UnlockedKeypair) -> &Session {
        self.logout();
        self.session.insert(Session::begin(keypair, self.clock.now()))
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_unlocked(&self) -> bool {
        self.session.is_some()
    }

    /// End the session (zeroizing the key), leave demo mode and drop the
    /// cached snapshot.
    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            session.end();
        }
        self.demo = None;
        self.account.reset();
    }

    /// Log out and delete the wallet and its settings.
    pub fn wipe(&mut self) -> Result<(), WalletError> {
        self.logout();
        self.secrets.wipe()
    }

    // ── Settings ────────────────────────────────────────────────────────

    pub fn settings(&self) -> Result<Settings, WalletError> {
        self.settings.load()
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), WalletError> {
        self.settings.save(settings)
    }

    // ── Demo mode ───────────────────────────────────────────────────────

    /// Switch to the simulated wallet. Any real session is ended first.
    pub fn start_demo(&mut self) -> &AccountSnapshot {
        self.logout();
        tracing::info!("demo mode started");
        self.demo
            .insert(SimulatedExecutor::new(&self.config.demo, self.clock.clone()))
            .snapshot()
    }

    pub fn exit_demo(&mut self) {
        if self.demo.take().is_some() {
            tracing::info!("demo mode ended");
        }
    }

    pub fn is_demo(&self) -> bool {
        self.demo.is_some()
    }

    // ── Account ─────────────────────────────────────────────────────────

    fn keypair(&self) -> Result<&UnlockedKeypair, WalletError> {
        self.session
            .as_ref()
            .map(Session::keypair)
            .ok_or(WalletError::WalletLocked)
    }

    /// The last fetched (or demo) snapshot, without a network call.
    pub fn snapshot(&self) -> Option<&AccountSnapshot> {
        match &self.demo {
            Some(demo) => Some(demo.snapshot()),
            None => self.account.snapshot(),
        }
    }

    pub async fn refresh_snapshot(&mut self) -> Result<AccountSnapshot, WalletError> {
        if let Some(demo) = &self.demo {
            return Ok(demo.snapshot().clone());
        }
        let address = self.keypair()?.address().clone();
        self.account.refresh(&address).await.cloned()
    }

    pub async fn recent_transactions(&mut self) -> Result<Vec<TransactionSummary>, WalletError> {
        Ok(self.refresh_snapshot().await?.recent_transactions)
    }

    /// Fund the account from the test-network faucet.
    pub async fn fund(&mut self) -> Result<AccountSnapshot, WalletError> {
        if self.demo.is_some() {
            return Err(WalletError::FundingUnavailable("not available in demo mode".to_string()));
        }
        let address = self.keypair()?.address().clone();
        self.account.fund(&address).await.cloned()
    }

    pub async fn add_trustline(&mut self) -> Result<Receipt, WalletError> {
        if self.demo.is_some() {
            return Err(WalletError::AlreadyTrusted);
        }
        let signer = self
            .session
            .as_ref()
            .map(Session::keypair)
            .ok_or(WalletError::WalletLocked)?;
        self.account.add_trustline(signer).await
    }

    pub async fn remove_trustline(&mut self) -> Result<Receipt, WalletError> {
        if self.demo.is_some() {
            return Err(WalletError::UnavailableInDemo("removing a trustline"));
        }
        let signer = self
            .session
            .as_ref()
            .map(Session::keypair)
            .ok_or(WalletError::WalletLocked)?;
        self.account.remove_trustline(signer).await
    }

    // ── Payments ────────────────────────────────────────────────────────

    /// Send a payment: simulated in demo mode, otherwise signed and
    /// submitted. Validation runs against the current snapshot, which is
    /// fetched first if there is none.
    pub async fn send(&mut self, request: &PaymentRequest) -> Result<Receipt, WalletError> {
        if let Some(demo) = self.demo.as_mut() {
            return self.payments.send_simulated(request, demo).await;
        }

        let signer = self
            .session
            .as_ref()
            .map(Session::keypair)
            .ok_or(WalletError::WalletLocked)?;
        let address = signer.address().clone();
        if self.account.snapshot_for(&address).is_none() {
            self.payments.precheck(request)?;
            self.account.refresh(&address).await?;
        }
        let snapshot = self
            .account
            .snapshot_for(&address)
            .ok_or(WalletError::AccountNotFound)?;

        let receipt = self.payments.send(request, snapshot, signer).await?;
        self.account.refresh_after_write(&address).await;
        Ok(receipt)
    }

    pub fn last_send_attempt(&self) -> Option<&SendAttempt> {
        self.payments.last_attempt()
    }
}
