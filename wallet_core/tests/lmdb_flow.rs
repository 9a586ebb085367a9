//! The wallet persisted in a real LMDB store survives a restart.

use std::sync::Arc;

use pocket_nullables::{NullClock, NullLedger};
use pocket_store_lmdb::LmdbStore;
use pocket_wallet_core::{KdfConfig, Wallet, WalletConfig, WalletError};

fn open_wallet(dir: &std::path::Path) -> Wallet {
    let store = LmdbStore::open(dir).expect("open store");
    let mut config = WalletConfig::default();
    config.kdf = KdfConfig {
        memory_kib: 256,
        iterations: 1,
        parallelism: 1,
    };
    Wallet::new(
        config,
        Arc::new(store),
        Arc::new(NullLedger::new()),
        Arc::new(NullClock::new(1_700_000_000)),
    )
}

#[test]
fn wallet_survives_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");

    let created = {
        let mut wallet = open_wallet(dir.path());
        wallet.create_wallet("2468").unwrap()
    };

    let mut wallet = open_wallet(dir.path());
    assert!(wallet.exists().unwrap());
    assert_eq!(wallet.record().unwrap().unwrap().public_key, created.public_key);
    assert_eq!(wallet.unlock("1357").unwrap_err(), WalletError::InvalidPin);
    assert_eq!(wallet.unlock("2468").unwrap().address(), &created.public_key);

    wallet.wipe().unwrap();
    drop(wallet);

    let wallet = open_wallet(dir.path());
    assert!(!wallet.exists().unwrap());
}
