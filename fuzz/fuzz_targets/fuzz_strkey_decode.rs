#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Decoding must never panic, and anything accepted must re-encode identically.
    if let Some(bytes) = pocket_crypto::decode_address(s) {
        let address = pocket_crypto::derive_address(&pocket_types::PublicKey(bytes));
        assert_eq!(address.as_str(), s);
    }
    if let Some(private) = pocket_crypto::decode_secret(s) {
        assert_eq!(pocket_crypto::encode_secret(&private), s);
    }
});
