//! End-to-end flows through the `Wallet` facade, wired to in-memory
//! nullables: create/unlock, funding, trustlines, real and simulated sends.

use std::sync::Arc;
use std::time::Duration;

use pocket_horizon::{BalanceLine, LedgerError, SubmitFailure};
use pocket_nullables::{NullClock, NullLedger, NullStore};
use pocket_store::KeyValueStore;
use pocket_types::{AccountAddress, Amount, AssetKind, NetworkId};
use pocket_wallet_core::secret_store::{WALLET_EXISTS_KEY, WALLET_KEY};
use pocket_wallet_core::settings::SETTINGS_KEY;
use pocket_wallet_core::{
    AccountState, KdfConfig, PaymentRequest, SendPhase, Settings, Wallet, WalletConfig,
    WalletError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    store: Arc<NullStore>,
    ledger: Arc<NullLedger>,
    wallet: Wallet,
}

fn test_config() -> WalletConfig {
    let mut config = WalletConfig::default();
    config.kdf = KdfConfig {
        memory_kib: 256,
        iterations: 1,
        parallelism: 1,
    };
    config.demo.delay_ms = 0;
    config
}

fn harness_with(config: WalletConfig) -> Harness {
    let store = Arc::new(NullStore::new());
    let ledger = Arc::new(NullLedger::new());
    let wallet = Wallet::new(
        config,
        store.clone(),
        ledger.clone(),
        Arc::new(NullClock::new(1_700_000_000)),
    );
    Harness {
        store,
        ledger,
        wallet,
    }
}

fn harness() -> Harness {
    harness_with(test_config())
}

fn other_address(seed: u8) -> String {
    let kp = pocket_crypto::keypair_from_seed(&[seed; 32]);
    pocket_crypto::derive_address(&kp.public).to_string()
}

fn usdc(balance: Amount) -> BalanceLine {
    BalanceLine::trustline(&NetworkId::Test.issued_asset(), balance)
}

/// Create a wallet and give its account `native` XLM plus optional USDC.
fn funded_wallet(native: i64, usdc_balance: Option<i64>) -> (Harness, AccountAddress) {
    let mut h = harness();
    let created = h.wallet.create_wallet("1234").unwrap();
    let lines = usdc_balance
        .map(|b| vec![usdc(Amount::from_units(b))])
        .unwrap_or_default();
    h.ledger.set_account(NullLedger::account(
        &created.public_key,
        Amount::from_units(native),
        lines,
    ));
    (h, created.public_key)
}

// ---------------------------------------------------------------------------
// 1. Create / unlock / restore
// ---------------------------------------------------------------------------

#[test]
fn create_then_unlock_with_same_pin() {
    let mut h = harness();
    assert!(!h.wallet.exists().unwrap());

    let created = h.wallet.create_wallet("1234").unwrap();
    assert_eq!(created.backup_phrase_words.len(), 12);
    assert!(h.wallet.exists().unwrap());
    assert!(h.wallet.is_unlocked());

    h.wallet.logout();
    assert!(!h.wallet.is_unlocked());

    let session = h.wallet.unlock("1234").unwrap();
    assert_eq!(session.address(), &created.public_key);
    assert_eq!(h.wallet.unlock("9999").unwrap_err(), WalletError::InvalidPin);
}

#[test]
fn unlock_without_wallet() {
    let mut h = harness();
    assert_eq!(h.wallet.unlock("1234").unwrap_err(), WalletError::NoWalletFound);
}

#[test]
fn second_wallet_is_refused() {
    let mut h = harness();
    h.wallet.create_wallet("1234").unwrap();
    assert_eq!(
        h.wallet.create_wallet("5678").unwrap_err(),
        WalletError::WalletAlreadyExists
    );
}

#[test]
fn backup_phrase_restores_the_same_account() {
    let mut h = harness();
    let created = h.wallet.create_wallet("1234").unwrap();
    let phrase = created.backup_phrase_words.join(" ");

    h.wallet.wipe().unwrap();
    assert!(!h.wallet.exists().unwrap());

    let restored = h.wallet.restore_wallet(&phrase, "424242").unwrap();
    assert_eq!(restored, created.public_key);
    h.wallet.logout();
    assert_eq!(h.wallet.unlock("424242").unwrap().address(), &created.public_key);
}

#[test]
fn restore_rejects_bad_phrase() {
    let mut h = harness();
    assert_eq!(
        h.wallet.restore_wallet("twelve words that are not a phrase", "1234").unwrap_err(),
        WalletError::InvalidBackupPhrase
    );
    assert!(h.store.is_empty());
}

#[test]
fn wipe_removes_all_keys() {
    let mut h = harness();
    h.wallet.create_wallet("1234").unwrap();
    h.wallet.save_settings(&Settings::default()).unwrap();
    assert_eq!(h.store.keys().len(), 3);

    h.wallet.wipe().unwrap();
    for key in [WALLET_KEY, WALLET_EXISTS_KEY, SETTINGS_KEY] {
        assert_eq!(h.store.get(key).unwrap(), None, "{key}");
    }
    assert!(!h.wallet.is_unlocked());
}

#[test]
fn settings_default_until_saved() {
    let mut h = harness();
    let settings = h.wallet.settings().unwrap();
    assert_eq!(settings.network, NetworkId::Test);
    assert_eq!(settings.tokens, vec!["XLM".to_string()]);

    let updated = Settings {
        network: NetworkId::Test,
        tokens: vec!["XLM".into(), "USDC".into()],
    };
    h.wallet.save_settings(&updated).unwrap();
    assert_eq!(h.wallet.settings().unwrap(), updated);
}

// ---------------------------------------------------------------------------
// 2. Locked wallet
// ---------------------------------------------------------------------------

#[tokio::test]
async fn locked_wallet_refuses_account_operations() {
    let mut h = harness();
    h.wallet.create_wallet("1234").unwrap();
    h.wallet.logout();

    assert_eq!(h.wallet.refresh_snapshot().await.unwrap_err(), WalletError::WalletLocked);
    assert_eq!(h.wallet.add_trustline().await.unwrap_err(), WalletError::WalletLocked);
    let request = PaymentRequest::new(other_address(2), "1", AssetKind::Native);
    assert_eq!(h.wallet.send(&request).await.unwrap_err(), WalletError::WalletLocked);
    assert_eq!(h.ledger.total_calls(), 0);
}

// ---------------------------------------------------------------------------
// 3. Account state transitions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fund_then_add_trustline() {
    let mut h = harness();
    let created = h.wallet.create_wallet("1234").unwrap();

    let snapshot = h.wallet.refresh_snapshot().await.unwrap();
    assert_eq!(snapshot.state(), AccountState::Unfunded);

    let snapshot = h.wallet.fund().await.unwrap();
    assert_eq!(snapshot.state(), AccountState::FundedNoTrustline);

    let receipt = h.wallet.add_trustline().await.unwrap();
    assert!(!receipt.simulated);
    assert_eq!(h.ledger.submit_calls(), 1);

    // The network applied the change-trust.
    h.ledger.set_account(NullLedger::account(
        &created.public_key,
        pocket_nullables::FAUCET_GRANT,
        vec![usdc(Amount::ZERO)],
    ));
    let snapshot = h.wallet.refresh_snapshot().await.unwrap();
    assert_eq!(snapshot.state(), AccountState::FundedWithTrustline);
    assert_eq!(snapshot.issued_balance, Some(Amount::ZERO));

    assert_eq!(h.wallet.add_trustline().await.unwrap_err(), WalletError::AlreadyTrusted);
    assert_eq!(h.ledger.submit_calls(), 1);
}

#[tokio::test]
async fn fund_is_unavailable_on_mainnet() {
    let mut config = test_config();
    config.network = NetworkId::Main;
    let mut h = harness_with(config);
    h.wallet.create_wallet("1234").unwrap();
    assert!(matches!(
        h.wallet.fund().await,
        Err(WalletError::FundingUnavailable(_))
    ));
    assert_eq!(h.ledger.total_calls(), 0);
}

#[tokio::test]
async fn refresh_failure_keeps_last_snapshot() {
    let (mut h, _) = funded_wallet(20, Some(4));
    let first = h.wallet.refresh_snapshot().await.unwrap();

    h.ledger.fail_loads(LedgerError::Transport("connection refused".into()));
    assert!(matches!(
        h.wallet.refresh_snapshot().await,
        Err(WalletError::NetworkUnavailable(_))
    ));
    assert_eq!(h.wallet.snapshot(), Some(&first));
}

#[tokio::test]
async fn recent_transactions_come_from_history() {
    let (mut h, address) = funded_wallet(20, None);
    let record: pocket_horizon::TransactionRecord = serde_json::from_str(
        r#"{"id": "abc123", "created_at": "2024-05-01T12:00:00Z", "memo": "rent"}"#,
    )
    .unwrap();
    h.ledger.set_history(&address, vec![record]);

    let recent = h.wallet.recent_transactions().await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, "abc123");
    assert_eq!(recent[0].memo.as_deref(), Some("rent"));
}

#[tokio::test(start_paused = true)]
async fn slow_network_times_out() {
    let mut config = test_config();
    config.request_timeout_secs = 1;
    let mut h = harness_with(config);
    h.wallet.create_wallet("1234").unwrap();
    h.ledger.set_latency(Duration::from_secs(5));

    assert!(matches!(
        h.wallet.refresh_snapshot().await,
        Err(WalletError::NetworkUnavailable(_))
    ));
}

// ---------------------------------------------------------------------------
// 4. Real sends
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_destination_rejected_before_network() {
    let (mut h, _) = funded_wallet(20, None);
    let request = PaymentRequest::new("not-an-address", "1", AssetKind::Native);
    assert!(matches!(
        h.wallet.send(&request).await,
        Err(WalletError::InvalidAddress(_))
    ));
    assert_eq!(h.ledger.total_calls(), 0);

    let attempt = h.wallet.last_send_attempt().unwrap();
    assert!(matches!(attempt.current(), SendPhase::Rejected(_)));
}

#[tokio::test]
async fn issued_send_without_trustline_makes_no_call() {
    let (mut h, _) = funded_wallet(20, None);
    h.wallet.refresh_snapshot().await.unwrap();
    let calls = h.ledger.total_calls();

    let request = PaymentRequest::new(other_address(2), "5", AssetKind::Issued);
    assert_eq!(h.wallet.send(&request).await.unwrap_err(), WalletError::TrustlineRequired);
    assert_eq!(h.ledger.total_calls(), calls);
}

#[tokio::test]
async fn unfunded_sender_is_rejected_locally() {
    let mut h = harness();
    h.wallet.create_wallet("1234").unwrap();
    let snapshot = h.wallet.refresh_snapshot().await.unwrap();
    assert!(!snapshot.exists);

    let request = PaymentRequest::new(other_address(2), "1", AssetKind::Native);
    assert!(matches!(
        h.wallet.send(&request).await,
        Err(WalletError::InsufficientBalance { .. })
    ));
    assert_eq!(h.ledger.submit_calls(), 0);
}

#[tokio::test]
async fn native_send_confirms() {
    let (mut h, _) = funded_wallet(20, None);
    let request = PaymentRequest::new(other_address(2), "3", AssetKind::Native).with_memo("thanks");
    let receipt = h.wallet.send(&request).await.unwrap();

    assert!(!receipt.simulated);
    assert_eq!(receipt.id.len(), 64);
    assert_eq!(h.ledger.submit_calls(), 1);

    let phases = h.wallet.last_send_attempt().unwrap().phases();
    assert_eq!(phases[0], SendPhase::Idle);
    assert_eq!(phases[1], SendPhase::Validating);
    assert_eq!(phases[2], SendPhase::Submitting);
    assert!(matches!(phases[3], SendPhase::Confirmed(_)));
}

#[tokio::test]
async fn recipient_without_trustline() {
    let (mut h, _) = funded_wallet(20, Some(10));
    h.ledger.reject_next_submit(SubmitFailure::NoTrust);
    let request = PaymentRequest::new(other_address(3), "5", AssetKind::Issued);
    assert_eq!(
        h.wallet.send(&request).await.unwrap_err(),
        WalletError::RecipientTrustlineMissing
    );
    assert!(matches!(
        h.wallet.last_send_attempt().unwrap().current(),
        SendPhase::Failed(WalletError::RecipientTrustlineMissing)
    ));
    assert_eq!(h.ledger.submit_calls(), 1);
}

#[tokio::test]
async fn sender_without_trustline_is_not_blamed_on_recipient() {
    let (mut h, _) = funded_wallet(20, Some(10));
    h.ledger.reject_next_submit(SubmitFailure::SourceNoTrust);
    let request = PaymentRequest::new(other_address(3), "5", AssetKind::Issued);
    assert_eq!(
        h.wallet.send(&request).await.unwrap_err(),
        WalletError::TrustlineRequired
    );
    assert_eq!(h.ledger.submit_calls(), 1);
}

#[tokio::test]
async fn underfunded_rejection_is_insufficient_balance() {
    let (mut h, _) = funded_wallet(20, None);
    h.ledger.reject_next_submit(SubmitFailure::Underfunded);
    let request = PaymentRequest::new(other_address(3), "19.99", AssetKind::Native);
    assert!(matches!(
        h.wallet.send(&request).await,
        Err(WalletError::InsufficientBalance { asset: "XLM", .. })
    ));
}

#[tokio::test]
async fn other_rejections_are_submission_failures() {
    let (mut h, _) = funded_wallet(20, None);
    h.ledger.reject_next_submit(SubmitFailure::BadSequence);
    let request = PaymentRequest::new(other_address(3), "1", AssetKind::Native);
    assert_eq!(
        h.wallet.send(&request).await.unwrap_err(),
        WalletError::SubmissionFailed("bad sequence number".into())
    );
}

// ---------------------------------------------------------------------------
// 5. Demo mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn simulated_send_adjusts_projection_only() {
    let mut h = harness();
    let snapshot = h.wallet.start_demo();
    assert_eq!(snapshot.native_balance.to_string(), "10.5");

    let request = PaymentRequest::new("DEMO_FRIEND", "3.0", AssetKind::Native);
    let receipt = h.wallet.send(&request).await.unwrap();

    assert!(receipt.simulated);
    assert_eq!(h.wallet.snapshot().unwrap().native_balance.to_string(), "7.5");
    assert_eq!(h.ledger.total_calls(), 0);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn simulated_send_validates_like_a_real_one() {
    let mut h = harness();
    h.wallet.start_demo();

    let request = PaymentRequest::new("", "1", AssetKind::Native);
    assert!(matches!(h.wallet.send(&request).await, Err(WalletError::InvalidAddress(_))));

    let request = PaymentRequest::new("DEMO_FRIEND", "0", AssetKind::Native);
    assert!(matches!(h.wallet.send(&request).await, Err(WalletError::InvalidAmount(_))));

    let request = PaymentRequest::new("DEMO_FRIEND", "15.01", AssetKind::Issued);
    assert!(matches!(
        h.wallet.send(&request).await,
        Err(WalletError::InsufficientBalance { asset: "USDC", .. })
    ));
    assert_eq!(h.ledger.total_calls(), 0);
}

#[tokio::test]
async fn demo_refuses_trustline_removal_without_submitting() {
    let mut h = harness();
    h.wallet.start_demo();
    let err = h.wallet.remove_trustline().await.unwrap_err();
    assert_eq!(err, WalletError::UnavailableInDemo("removing a trustline"));
    assert_eq!(err.to_string(), "removing a trustline is not available in demo mode");
    assert_eq!(h.ledger.total_calls(), 0);
}

#[tokio::test]
async fn demo_ends_real_session() {
    let mut h = harness();
    h.wallet.create_wallet("1234").unwrap();
    h.wallet.start_demo();
    assert!(h.wallet.is_demo());
    assert!(!h.wallet.is_unlocked());

    let snapshot = h.wallet.refresh_snapshot().await.unwrap();
    assert_eq!(snapshot.recent_transactions.len(), 3);

    h.wallet.exit_demo();
    assert!(!h.wallet.is_demo());
    assert_eq!(h.wallet.refresh_snapshot().await.unwrap_err(), WalletError::WalletLocked);
}
