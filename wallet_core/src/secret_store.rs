//! PIN-encrypted storage of the wallet's secret key.
//!
//! The secret is sealed into a single JSON blob:
//! 1. Argon2id derives a 32-byte key from the PIN and a random per-wallet salt
//! 2. AES-256-GCM encrypts the JSON record `{secret_key, public_key, created_at}`
//! 3. The blob stores every parameter needed to reverse this, plus the
//!    public key in clear so the address can be shown while locked
//!
//! A wrong PIN and a damaged blob are reported identically as
//! [`WalletError::InvalidPin`].

use std::sync::Arc;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use pocket_store::KeyValueStore;
use pocket_types::{AccountAddress, Clock, KeyPair, Timestamp};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::KdfConfig;
use crate::session::UnlockedKeypair;
use crate::settings::SETTINGS_KEY;
use crate::WalletError;

/// Store key of the existence flag.
pub const WALLET_EXISTS_KEY: &str = "pocket_wallet_exists";
/// Store key of the encrypted blob.
pub const WALLET_KEY: &str = "pocket_wallet";

const BLOB_VERSION: u32 = 1;
const CIPHER: &str = "aes-256-gcm";
const KDF: &str = "argon2id";

/// Salt length in bytes.
const SALT_LEN: usize = 32;
/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;

/// Ceilings on parameters read back from a blob; a damaged blob must not
/// be able to request unbounded work.
const MAX_MEMORY_KIB: u32 = 1024 * 1024;
const MAX_ITERATIONS: u32 = 64;
const MAX_PARALLELISM: u32 = 16;

pub const MIN_PIN_LEN: usize = 4;
pub const MAX_PIN_LEN: usize = 12;

/// Argon2id parameters as recorded in the blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl From<KdfConfig> for KdfParams {
    fn from(c: KdfConfig) -> Self {
        Self {
            memory: c.memory_kib,
            iterations: c.iterations,
            parallelism: c.parallelism,
        }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        KdfConfig::default().into()
    }
}

/// The persisted blob.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct WalletBlob {
    version: u32,
    public_key: String,
    created_at: Timestamp,
    crypto: BlobCrypto,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct BlobCrypto {
    cipher: String,
    kdf: String,
    kdf_params: KdfParams,
    /// Hex-encoded salt.
    salt: String,
    /// Hex-encoded nonce.
    nonce: String,
    /// Hex-encoded ciphertext.
    ciphertext: String,
}

/// The plaintext sealed inside the blob.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
struct SecretRecord {
    secret_key: String,
    public_key: String,
    created_at: u64,
}

/// Metadata of a stored wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletRecord {
    pub public_key: AccountAddress,
    pub created_at: Timestamp,
}

/// Check the PIN format: 4–12 ASCII digits.
pub fn validate_pin(pin: &str) -> Result<(), WalletError> {
    let len_ok = (MIN_PIN_LEN..=MAX_PIN_LEN).contains(&pin.len());
    if len_ok && pin.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(WalletError::InvalidPin)
    }
}

/// Owns the wallet's key material at rest.
pub struct SecretStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    kdf: KdfParams,
}

impl SecretStore {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, kdf: KdfParams) -> Self {
        Self { store, clock, kdf }
    }

    /// Encrypt `keypair` under `pin` and persist it.
    pub fn create(&self, keypair: &KeyPair, pin: &str) -> Result<WalletRecord, WalletError> {
        validate_pin(pin)?;
        if self.exists()? {
            return Err(WalletError::WalletAlreadyExists);
        }

        let address = pocket_crypto::derive_address(&keypair.public);
        let created_at = self.clock.now();
        let record = SecretRecord {
            secret_key: pocket_crypto::encode_secret(&keypair.private),
            public_key: address.to_string(),
            created_at: created_at.as_secs(),
        };
        let plaintext = Zeroizing::new(
            serde_json::to_vec(&record)
                .map_err(|e| WalletError::StorageFailure(format!("encode record: {e}")))?,
        );

        let blob = seal(&plaintext, pin, self.kdf, &address, created_at)?;
        let blob_json = serde_json::to_string(&blob)
            .map_err(|e| WalletError::StorageFailure(format!("encode blob: {e}")))?;

        self.store
            .put_all(&[(WALLET_KEY, blob_json.as_str()), (WALLET_EXISTS_KEY, "true")])?;

        tracing::info!(address = %pocket_utils::short_id(address.as_str()), "wallet created");
        Ok(WalletRecord {
            public_key: address,
            created_at,
        })
    }

    /// Decrypt the stored key pair with `pin`.
    pub fn unlock(&self, pin: &str) -> Result<UnlockedKeypair, WalletError> {
        if !self.exists()? {
            return Err(WalletError::NoWalletFound);
        }
        let blob_json = self
            .store
            .get(WALLET_KEY)?
            .ok_or(WalletError::NoWalletFound)?;

        let result = open_blob(&blob_json, pin);
        match &result {
            Ok(kp) => tracing::debug!(address = %pocket_utils::short_id(kp.address().as_str()), "wallet unlocked"),
            Err(_) => tracing::debug!("unlock rejected"),
        }
        result
    }

    /// O(1) check of the existence flag.
    pub fn exists(&self) -> Result<bool, WalletError> {
        Ok(self.store.get(WALLET_EXISTS_KEY)?.as_deref() == Some("true"))
    }

    /// The stored wallet's address and creation time, readable without the PIN.
    pub fn record(&self) -> Result<Option<WalletRecord>, WalletError> {
        if !self.exists()? {
            return Ok(None);
        }
        let Some(blob_json) = self.store.get(WALLET_KEY)? else {
            return Ok(None);
        };
        let blob: WalletBlob = serde_json::from_str(&blob_json)
            .map_err(|e| WalletError::StorageFailure(format!("unreadable wallet blob: {e}")))?;
        Ok(Some(WalletRecord {
            public_key: AccountAddress::new(blob.public_key),
            created_at: blob.created_at,
        }))
    }

    /// Delete the wallet and its settings irreversibly.
    pub fn wipe(&self) -> Result<(), WalletError> {
        self.store
            .delete_all(&[WALLET_KEY, WALLET_EXISTS_KEY, SETTINGS_KEY])?;
        tracing::info!("wallet wiped");
        Ok(())
    }
}

fn seal(
    plaintext: &[u8],
    pin: &str,
    params: KdfParams,
    address: &AccountAddress,
    created_at: Timestamp,
) -> Result<WalletBlob, WalletError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(pin, &salt, params)
        .map_err(|e| WalletError::StorageFailure(format!("key derivation: {e}")))?;
    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| WalletError::StorageFailure(format!("cipher init: {e}")))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| WalletError::StorageFailure(format!("encryption: {e}")))?;

    Ok(WalletBlob {
        version: BLOB_VERSION,
        public_key: address.to_string(),
        created_at,
        crypto: BlobCrypto {
            cipher: CIPHER.to_string(),
            kdf: KDF.to_string(),
            kdf_params: params,
            salt: hex::encode(salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        },
    })
}

/// Decrypt a serialized blob with `pin`.
///
/// Every failure, whether a wrong PIN or damaged data, is [`WalletError::InvalidPin`].
pub fn open_blob(blob_json: &str, pin: &str) -> Result<UnlockedKeypair, WalletError> {
    let blob: WalletBlob = serde_json::from_str(blob_json).map_err(|_| WalletError::InvalidPin)?;
    if blob.version != BLOB_VERSION || blob.crypto.cipher != CIPHER || blob.crypto.kdf != KDF {
        return Err(WalletError::InvalidPin);
    }

    let params = blob.crypto.kdf_params;
    if params.memory > MAX_MEMORY_KIB
        || params.iterations > MAX_ITERATIONS
        || params.parallelism > MAX_PARALLELISM
    {
        return Err(WalletError::InvalidPin);
    }

    let salt = hex::decode(&blob.crypto.salt).map_err(|_| WalletError::InvalidPin)?;
    let nonce_bytes = hex::decode(&blob.crypto.nonce).map_err(|_| WalletError::InvalidPin)?;
    let ciphertext = hex::decode(&blob.crypto.ciphertext).map_err(|_| WalletError::InvalidPin)?;
    if nonce_bytes.len() != NONCE_LEN {
        return Err(WalletError::InvalidPin);
    }

    let key = derive_key(pin, &salt, params).map_err(|_| WalletError::InvalidPin)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| WalletError::InvalidPin)?;
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
            .map_err(|_| WalletError::InvalidPin)?,
    );

    let record: SecretRecord =
        serde_json::from_slice(&plaintext).map_err(|_| WalletError::InvalidPin)?;
    let keypair =
        pocket_crypto::keypair_from_secret(&record.secret_key).ok_or(WalletError::InvalidPin)?;

    let unlocked = UnlockedKeypair::new(keypair);
    if unlocked.address().as_str() != record.public_key
        || unlocked.address().as_str() != blob.public_key
    {
        return Err(WalletError::InvalidPin);
    }
    Ok(unlocked)
}

/// Derive a 32-byte key from the PIN and salt using Argon2id.
fn derive_key(
    pin: &str,
    salt: &[u8],
    params: KdfParams,
) -> Result<Zeroizing<[u8; 32]>, argon2::Error> {
    let params = Params::new(params.memory, params.iterations, params.parallelism, Some(32))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; 32]);
    argon2.hash_password_into(pin.as_bytes(), salt, &mut output[..])?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocket_nullables::{NullClock, NullStore};

    const FAST_KDF: KdfParams = KdfParams {
        memory: 256,
        iterations: 1,
        parallelism: 1,
    };

    fn secret_store() -> (Arc<NullStore>, SecretStore) {
        let store = Arc::new(NullStore::new());
        let ss = SecretStore::new(store.clone(), Arc::new(NullClock::new(1_700_000_000)), FAST_KDF);
        (store, ss)
    }

    #[test]
    fn create_then_unlock_returns_same_key() {
        let (_, ss) = secret_store();
        let kp = pocket_crypto::generate_keypair();
        let expected_secret = pocket_crypto::encode_secret(&kp.private);

        let record = ss.create(&kp, "1234").unwrap();
        assert_eq!(record.public_key, pocket_crypto::derive_address(&kp.public));
        assert_eq!(record.created_at, Timestamp::new(1_700_000_000));

        let unlocked = ss.unlock("1234").unwrap();
        assert_eq!(unlocked.public_key(), &kp.public);
        assert_eq!(unlocked.export_secret(), expected_secret);
    }

    #[test]
    fn wrong_pin_is_invalid_pin() {
        let (_, ss) = secret_store();
        ss.create(&pocket_crypto::generate_keypair(), "1234").unwrap();
        assert_eq!(ss.unlock("4321").unwrap_err(), WalletError::InvalidPin);
    }

    #[test]
    fn unlock_without_wallet() {
        let (_, ss) = secret_store();
        assert_eq!(ss.unlock("1234").unwrap_err(), WalletError::NoWalletFound);
        assert!(!ss.exists().unwrap());
    }

    #[test]
    fn pin_format_enforced_at_creation() {
        let (store, ss) = secret_store();
        let kp = pocket_crypto::generate_keypair();
        for pin in ["", "123", "12a4", "1234567890123", "12 34"] {
            assert_eq!(ss.create(&kp, pin).unwrap_err(), WalletError::InvalidPin, "{pin:?}");
        }
        assert!(store.is_empty());
    }

    #[test]
    fn second_create_is_refused() {
        let (_, ss) = secret_store();
        ss.create(&pocket_crypto::generate_keypair(), "1234").unwrap();
        assert_eq!(
            ss.create(&pocket_crypto::generate_keypair(), "1234").unwrap_err(),
            WalletError::WalletAlreadyExists
        );
    }

    #[test]
    fn write_failure_is_storage_failure() {
        let (store, ss) = secret_store();
        store.set_fail_writes(true);
        let err = ss.create(&pocket_crypto::generate_keypair(), "1234").unwrap_err();
        assert!(matches!(err, WalletError::StorageFailure(_)));
        assert!(!ss.exists().unwrap());
    }

    #[test]
    fn pin_is_never_stored() {
        let (store, ss) = secret_store();
        let kp = pocket_crypto::generate_keypair();
        ss.create(&kp, "98765432").unwrap();
        let blob = store.get(WALLET_KEY).unwrap().unwrap();
        assert!(!blob.contains("98765432"));
        assert!(!blob.contains(&pocket_crypto::encode_secret(&kp.private)));
    }

    #[test]
    fn blob_layout() {
        let (store, ss) = secret_store();
        ss.create(&pocket_crypto::generate_keypair(), "1234").unwrap();
        let blob: serde_json::Value =
            serde_json::from_str(&store.get(WALLET_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(blob["version"], 1);
        assert_eq!(blob["crypto"]["cipher"], "aes-256-gcm");
        assert_eq!(blob["crypto"]["kdf"], "argon2id");
        assert_eq!(blob["crypto"]["kdf_params"]["memory"], 256);
        assert_eq!(blob["crypto"]["salt"].as_str().unwrap().len(), 64);
        assert_eq!(blob["crypto"]["nonce"].as_str().unwrap().len(), 24);
    }

    #[test]
    fn same_key_and_pin_give_different_blobs() {
        let kp = pocket_crypto::keypair_from_seed(&[1u8; 32]);
        let (s1, ss1) = secret_store();
        let (s2, ss2) = secret_store();
        ss1.create(&kp, "1234").unwrap();
        ss2.create(&kp, "1234").unwrap();
        assert_ne!(s1.get(WALLET_KEY).unwrap(), s2.get(WALLET_KEY).unwrap());
    }

    #[test]
    fn corrupted_blob_is_invalid_pin() {
        let (store, ss) = secret_store();
        ss.create(&pocket_crypto::generate_keypair(), "1234").unwrap();
        let blob = store.get(WALLET_KEY).unwrap().unwrap();

        let mut value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        let ct = value["crypto"]["ciphertext"].as_str().unwrap().to_string();
        let flipped = if ct.starts_with('0') { format!("1{}", &ct[1..]) } else { format!("0{}", &ct[1..]) };
        value["crypto"]["ciphertext"] = serde_json::Value::String(flipped);
        store.seed(WALLET_KEY, &value.to_string());
        assert_eq!(ss.unlock("1234").unwrap_err(), WalletError::InvalidPin);

        store.seed(WALLET_KEY, "garbage");
        assert_eq!(ss.unlock("1234").unwrap_err(), WalletError::InvalidPin);
    }

    #[test]
    fn swapped_public_key_is_invalid_pin() {
        let (store, ss) = secret_store();
        ss.create(&pocket_crypto::generate_keypair(), "1234").unwrap();
        let mut value: serde_json::Value =
            serde_json::from_str(&store.get(WALLET_KEY).unwrap().unwrap()).unwrap();
        let other = pocket_crypto::derive_address(&pocket_crypto::generate_keypair().public);
        value["public_key"] = serde_json::Value::String(other.to_string());
        store.seed(WALLET_KEY, &value.to_string());
        assert_eq!(ss.unlock("1234").unwrap_err(), WalletError::InvalidPin);
    }

    #[test]
    fn oversized_kdf_params_rejected_without_work() {
        let (store, ss) = secret_store();
        ss.create(&pocket_crypto::generate_keypair(), "1234").unwrap();
        let mut value: serde_json::Value =
            serde_json::from_str(&store.get(WALLET_KEY).unwrap().unwrap()).unwrap();
        value["crypto"]["kdf_params"]["memory"] = serde_json::json!(u32::MAX);
        store.seed(WALLET_KEY, &value.to_string());
        assert_eq!(ss.unlock("1234").unwrap_err(), WalletError::InvalidPin);
    }

    #[test]
    fn record_is_readable_while_locked() {
        let (_, ss) = secret_store();
        assert_eq!(ss.record().unwrap(), None);
        let kp = pocket_crypto::generate_keypair();
        ss.create(&kp, "1234").unwrap();
        let record = ss.record().unwrap().unwrap();
        assert_eq!(record.public_key, pocket_crypto::derive_address(&kp.public));
    }

    #[test]
    fn wipe_removes_all_keys() {
        let (store, ss) = secret_store();
        ss.create(&pocket_crypto::generate_keypair(), "1234").unwrap();
        store.seed(SETTINGS_KEY, r#"{"network":"testnet","tokens":["XLM"]}"#);
        ss.wipe().unwrap();
        assert!(store.is_empty());
        assert!(!ss.exists().unwrap());
        assert_eq!(ss.unlock("1234").unwrap_err(), WalletError::NoWalletFound);
    }
}
