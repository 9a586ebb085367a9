#![no_main]

use libfuzzer_sys::fuzz_target;
use pocket_wallet_core::WalletError;

fuzz_target!(|data: &[u8]| {
    let Ok(blob) = std::str::from_utf8(data) else {
        return;
    };

    // A damaged blob is always reported as a wrong PIN, never a panic.
    match pocket_wallet_core::open_blob(blob, "1234") {
        Ok(_) | Err(WalletError::InvalidPin) => {}
        Err(other) => panic!("unexpected error kind: {other:?}"),
    }
});
