//! Unlocked key material and the session that owns it.

use std::fmt;

use pocket_types::{AccountAddress, KeyPair, PublicKey, Timestamp};

/// A decrypted key pair, held only in memory.
///
/// The private key is zeroized when this value drops. It is neither
/// `Clone` nor `Serialize`, and `Debug` shows only the address.
pub struct UnlockedKeypair {
    keypair: KeyPair,
    address: AccountAddress,
}

impl UnlockedKeypair {
    pub(crate) fn new(keypair: KeyPair) -> Self {
        let address = pocket_crypto::derive_address(&keypair.public);
        Self { keypair, address }
    }

    pub fn address(&self) -> &AccountAddress {
        &self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keypair.public
    }

    /// The `S…` secret seed, for an explicit user-requested export.
    pub fn export_secret(&self) -> String {
        pocket_crypto::encode_secret(&self.keypair.private)
    }

    pub(crate) fn keypair(&self) -> &KeyPair {
        &self.keypair
    }
}

impl fmt::Debug for UnlockedKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnlockedKeypair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// One unlocked period of wallet use.
///
/// Created by [`Session::begin`] after a successful unlock and consumed by
/// [`Session::end`]; there is at most one per `Wallet`.
#[derive(Debug)]
pub struct Session {
    keypair: UnlockedKeypair,
    started_at: Timestamp,
}

impl Session {
    pub fn begin(keypair: UnlockedKeypair, now: Timestamp) -> Self {
        tracing::debug!(address = %pocket_utils::short_id(keypair.address().as_str()), "session started");
        Self {
            keypair,
            started_at: now,
        }
    }

    pub fn address(&self) -> &AccountAddress {
        self.keypair.address()
    }

    pub fn keypair(&self) -> &UnlockedKeypair {
        &self.keypair
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Close the session; key material is wiped as it drops.
    pub fn end(self) {
        tracing::debug!(address = %pocket_utils::short_id(self.address().as_str()), "session ended");
    }
}
