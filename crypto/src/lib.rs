//! Key material for the pocket wallet.
//!
//! - **Ed25519** for account keys and transaction signatures
//! - **SHA-256** for transaction hashes and network ids
//! - **StrKey** `G…`/`S…` encoding with CRC16 checksums
//! - **BIP39 + SLIP-10** 12-word backup phrases on the `m/44'/148'/0'` path

pub mod hash;
pub mod keys;
pub mod mnemonic;
pub mod sign;
pub mod strkey;

pub use hash::{network_id, sha256, sha256_multi};
pub use keys::{
    generate_keypair, keypair_from_private, keypair_from_secret, keypair_from_seed,
    public_from_private,
};
pub use mnemonic::{
    generate_mnemonic, keypair_from_mnemonic, validate_mnemonic, MnemonicError,
    BACKUP_PHRASE_WORDS,
};
pub use sign::{sign_message, verify_signature};
pub use strkey::{decode_address, decode_secret, derive_address, encode_secret, validate_address};
