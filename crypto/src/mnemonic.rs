//! BIP39 backup phrases and SEP-0005 key derivation.
//!
//! A new wallet gets a 12-word mnemonic (128-bit entropy). The account key is
//! derived from the BIP39 seed with SLIP-10 Ed25519 hardened derivation along
//! `m/44'/148'/0'` (148 = Stellar coin type), so the phrase alone restores the
//! same account in any SEP-0005 wallet.

use bip39::Mnemonic;
use hmac::{Hmac, Mac};
use pocket_types::{KeyPair, PrivateKey};
use sha2::Sha512;
use thiserror::Error;
use zeroize::Zeroize;

type HmacSha512 = Hmac<Sha512>;

/// SLIP-10 master key salt for the Ed25519 curve.
const SLIP10_ED25519_KEY: &[u8] = b"ed25519 seed";

/// Derivation path `m/44'/148'/0'`; every level is hardened.
const DERIVATION_PATH: [u32; 3] = [44, 148, 0];

const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Words in a freshly generated backup phrase.
pub const BACKUP_PHRASE_WORDS: usize = 12;

/// Errors arising from mnemonic operations.
#[derive(Debug, Error)]
pub enum MnemonicError {
    #[error("invalid mnemonic phrase: {0}")]
    InvalidMnemonic(String),

    #[error("key derivation failed: {0}")]
    DerivationFailed(String),
}

/// Generate a new 12-word BIP39 mnemonic from 128-bit entropy.
pub fn generate_mnemonic() -> Result<String, MnemonicError> {
    let mut entropy = [0u8; 16];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut entropy);
    let mnemonic = Mnemonic::from_entropy(&entropy)
        .map_err(|e| MnemonicError::DerivationFailed(e.to_string()));
    entropy.zeroize();
    Ok(mnemonic?.to_string())
}

/// Derive the account key pair for a BIP39 mnemonic phrase.
///
/// Process:
/// 1. Validate the mnemonic and derive the 64-byte BIP39 seed (empty passphrase)
/// 2. SLIP-10 master key: HMAC-SHA512(key = "ed25519 seed", data = seed)
/// 3. For each hardened index i: HMAC-SHA512(key = chain code, data = 0x00 || key || ser32(i))
/// 4. The final 32-byte key is the Ed25519 secret seed
pub fn keypair_from_mnemonic(mnemonic: &str) -> Result<KeyPair, MnemonicError> {
    let mnemonic = Mnemonic::parse_normalized(mnemonic)
        .map_err(|e| MnemonicError::InvalidMnemonic(e.to_string()))?;

    let mut seed = mnemonic.to_seed_normalized("");
    let derived = derive_slip10(&seed);
    seed.zeroize();
    let (mut key, mut chain_code) = derived?;

    let keypair = crate::keys::keypair_from_private(PrivateKey(key));
    key.zeroize();
    chain_code.zeroize();
    Ok(keypair)
}

fn derive_slip10(seed: &[u8]) -> Result<([u8; 32], [u8; 32]), MnemonicError> {
    let (mut key, mut chain_code) = hmac_split(SLIP10_ED25519_KEY, &[seed])?;

    for index in DERIVATION_PATH {
        let hardened = (index | HARDENED_OFFSET).to_be_bytes();
        let (child_key, child_chain) = hmac_split(&chain_code, &[&[0u8], &key, &hardened])?;
        key.zeroize();
        chain_code.zeroize();
        key = child_key;
        chain_code = child_chain;
    }

    Ok((key, chain_code))
}

/// HMAC-SHA512 over the concatenated parts, split into (left 32, right 32).
fn hmac_split(key: &[u8], parts: &[&[u8]]) -> Result<([u8; 32], [u8; 32]), MnemonicError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| MnemonicError::DerivationFailed(e.to_string()))?;
    for part in parts {
        mac.update(part);
    }
    let output = mac.finalize().into_bytes();

    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&output[..32]);
    right.copy_from_slice(&output[32..]);
    Ok((left, right))
}

/// Validate that a mnemonic phrase is a valid BIP39 mnemonic.
pub fn validate_mnemonic(mnemonic: &str) -> bool {
    Mnemonic::parse_normalized(mnemonic).is_ok()
}
