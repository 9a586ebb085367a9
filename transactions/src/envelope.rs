//! Signing and envelope serialisation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pocket_types::{KeyPair, Signature, TxHash};

use crate::model::Transaction;
use crate::xdr::{self, ENVELOPE_TYPE_TX};
use crate::TransactionError;

/// A transaction plus its signatures, ready for submission.
#[derive(Clone, Debug)]
pub struct SignedEnvelope {
    pub transaction: Transaction,
    pub hash: TxHash,
    tx_xdr: Vec<u8>,
    signatures: Vec<([u8; 4], Signature)>,
}

/// Hash that signers sign: SHA-256 of network id, envelope type and body.
pub fn transaction_hash(network_passphrase: &str, tx_xdr: &[u8]) -> TxHash {
    let network_id = pocket_crypto::network_id(network_passphrase);
    TxHash::new(pocket_crypto::sha256_multi(&[
        &network_id,
        &ENVELOPE_TYPE_TX.to_be_bytes(),
        tx_xdr,
    ]))
}

impl SignedEnvelope {
    /// Encode and hash `transaction` for `network_passphrase`, then sign it.
    pub fn sign(
        transaction: Transaction,
        network_passphrase: &str,
        signer: &KeyPair,
    ) -> Result<Self, TransactionError> {
        let tx_xdr = xdr::encode_transaction(&transaction)?;
        let hash = transaction_hash(network_passphrase, &tx_xdr);
        let signature = pocket_crypto::sign_message(hash.as_bytes(), &signer.private);
        Ok(Self {
            transaction,
            hash,
            tx_xdr,
            signatures: vec![(signer.public.hint(), signature)],
        })
    }

    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter().map(|(_, s)| s)
    }

    pub fn to_xdr(&self) -> Vec<u8> {
        xdr::encode_envelope(&self.tx_xdr, &self.signatures)
    }

    /// Base64 envelope as accepted by the submission endpoint.
    pub fn to_xdr_base64(&self) -> String {
        STANDARD.encode(self.to_xdr())
    }
}
