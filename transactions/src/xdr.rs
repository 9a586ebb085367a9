//! XDR encoding of transactions.
//!
//! Only the subset the wallet produces is covered: `ENVELOPE_TYPE_TX`
//! envelopes carrying payment and change-trust operations, with an
//! optional time-bound precondition and an optional text memo.
//!
//! XDR is big-endian; variable-length data is length-prefixed and padded
//! with zeros to a multiple of four bytes.

use pocket_types::{AccountAddress, Asset, Signature};

use crate::model::{Memo, Operation, TimeBounds, Transaction};
use crate::TransactionError;

pub const ENVELOPE_TYPE_TX: i32 = 2;

const KEY_TYPE_ED25519: i32 = 0;

const PRECOND_NONE: i32 = 0;
const PRECOND_TIME: i32 = 1;

const MEMO_NONE: i32 = 0;
const MEMO_TEXT: i32 = 1;

const ASSET_TYPE_NATIVE: i32 = 0;
const ASSET_TYPE_CREDIT_ALPHANUM4: i32 = 1;
const ASSET_TYPE_CREDIT_ALPHANUM12: i32 = 2;

const OP_PAYMENT: i32 = 1;
const OP_CHANGE_TRUST: i32 = 6;

/// Append-only XDR buffer.
#[derive(Debug, Default)]
pub struct XdrWriter {
    buf: Vec<u8>,
}

impl XdrWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Fixed-length opaque: raw bytes plus padding.
    pub fn write_fixed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        self.pad(bytes.len());
    }

    /// Variable-length opaque or string: u32 length, bytes, padding.
    pub fn write_var(&mut self, bytes: &[u8]) {
        self.write_u32(bytes.len() as u32);
        self.write_fixed(bytes);
    }

    fn pad(&mut self, len: usize) {
        let rem = len % 4;
        if rem != 0 {
            self.buf.extend(std::iter::repeat(0u8).take(4 - rem));
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

fn write_account_id(w: &mut XdrWriter, account: &AccountAddress) -> Result<(), TransactionError> {
    let key = pocket_crypto::decode_address(account.as_str())
        .ok_or_else(|| TransactionError::InvalidAccount(account.to_string()))?;
    w.write_i32(KEY_TYPE_ED25519);
    w.write_fixed(&key);
    Ok(())
}

fn write_asset(w: &mut XdrWriter, asset: &Asset) -> Result<(), TransactionError> {
    match asset {
        Asset::Native => w.write_i32(ASSET_TYPE_NATIVE),
        Asset::Credit { code, issuer } => {
            let (kind, width) = if code.is_short() {
                (ASSET_TYPE_CREDIT_ALPHANUM4, 4)
            } else {
                (ASSET_TYPE_CREDIT_ALPHANUM12, 12)
            };
            w.write_i32(kind);
            let mut padded = [0u8; 12];
            padded[..code.as_str().len()].copy_from_slice(code.as_str().as_bytes());
            w.write_fixed(&padded[..width]);
            write_account_id(w, issuer)?;
        }
    }
    Ok(())
}

fn write_memo(w: &mut XdrWriter, memo: &Memo) {
    match memo {
        Memo::None => w.write_i32(MEMO_NONE),
        Memo::Text(text) => {
            w.write_i32(MEMO_TEXT);
            w.write_var(text.as_bytes());
        }
    }
}

fn write_preconditions(w: &mut XdrWriter, bounds: Option<&TimeBounds>) {
    match bounds {
        None => w.write_i32(PRECOND_NONE),
        Some(tb) => {
            w.write_i32(PRECOND_TIME);
            w.write_u64(tb.min_time);
            w.write_u64(tb.max_time);
        }
    }
}

fn write_operation(w: &mut XdrWriter, op: &Operation) -> Result<(), TransactionError> {
    // no per-operation source account
    w.write_u32(0);
    match op {
        Operation::Payment {
            destination,
            asset,
            amount,
        } => {
            w.write_i32(OP_PAYMENT);
            write_account_id(w, destination)?;
            write_asset(w, asset)?;
            w.write_i64(amount.stroops());
        }
        Operation::ChangeTrust { asset, limit } => {
            w.write_i32(OP_CHANGE_TRUST);
            write_asset(w, asset)?;
            w.write_i64(*limit);
        }
    }
    Ok(())
}

/// Encode the `Transaction` body (the part that is hashed and signed).
pub fn encode_transaction(tx: &Transaction) -> Result<Vec<u8>, TransactionError> {
    let mut w = XdrWriter::new();
    write_account_id(&mut w, &tx.source)?;
    w.write_u32(tx.fee);
    w.write_i64(tx.sequence);
    write_preconditions(&mut w, tx.time_bounds.as_ref());
    write_memo(&mut w, &tx.memo);
    w.write_u32(tx.operations.len() as u32);
    for op in &tx.operations {
        write_operation(&mut w, op)?;
    }
    // ext
    w.write_i32(0);
    Ok(w.into_bytes())
}

/// Encode a full envelope from an already-encoded transaction body.
pub fn encode_envelope(tx_xdr: &[u8], signatures: &[([u8; 4], Signature)]) -> Vec<u8> {
    let mut w = XdrWriter::new();
    w.write_i32(ENVELOPE_TYPE_TX);
    w.buf.extend_from_slice(tx_xdr);
    w.write_u32(signatures.len() as u32);
    for (hint, sig) in signatures {
        w.write_fixed(hint);
        w.write_var(sig.as_bytes());
    }
    w.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocket_types::{Amount, AssetCode};

    const ISSUER: &str = "GBBD47IF6LWK7P7MDEVSCWR7DPUWV3NY3DTQEVFL4NAT4AQH3ZLLFLA5";

    fn usdc() -> Asset {
        Asset::credit(AssetCode::new("USDC").unwrap(), AccountAddress::new(ISSUER))
    }

    #[test]
    fn var_data_is_padded() {
        let mut w = XdrWriter::new();
        w.write_var(b"hello");
        assert_eq!(w.into_bytes(), [0, 0, 0, 5, b'h', b'e', b'l', b'l', b'o', 0, 0, 0]);
    }

    #[test]
    fn aligned_var_data_has_no_padding() {
        let mut w = XdrWriter::new();
        w.write_var(b"rent");
        assert_eq!(w.len(), 8);
    }

    #[test]
    fn native_asset_is_one_word() {
        let mut w = XdrWriter::new();
        write_asset(&mut w, &Asset::Native).unwrap();
        assert_eq!(w.into_bytes(), [0, 0, 0, 0]);
    }

    #[test]
    fn short_credit_asset_layout() {
        let mut w = XdrWriter::new();
        write_asset(&mut w, &usdc()).unwrap();
        let bytes = w.into_bytes();
        // type + code4 + key type + key
        assert_eq!(bytes.len(), 4 + 4 + 4 + 32);
        assert_eq!(&bytes[..8], &[0, 0, 0, 1, b'U', b'S', b'D', b'C']);
        assert_eq!(&bytes[8..12], &[0, 0, 0, 0]);
        assert_eq!(&bytes[12..], &pocket_crypto::decode_address(ISSUER).unwrap());
    }

    #[test]
    fn long_credit_asset_layout() {
        let asset = Asset::credit(AssetCode::new("LONGCODE").unwrap(), AccountAddress::new(ISSUER));
        let mut w = XdrWriter::new();
        write_asset(&mut w, &asset).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 4 + 12 + 4 + 32);
        assert_eq!(&bytes[..4], &[0, 0, 0, 2]);
        assert_eq!(&bytes[4..16], b"LONGCODE\0\0\0\0");
    }

    #[test]
    fn bad_issuer_is_an_error() {
        let asset = Asset::credit(AssetCode::new("USDC").unwrap(), AccountAddress::new("GNOPE"));
        let mut w = XdrWriter::new();
        assert!(matches!(
            write_asset(&mut w, &asset),
            Err(TransactionError::InvalidAccount(_))
        ));
    }

    #[test]
    fn change_trust_operation_layout() {
        let mut w = XdrWriter::new();
        write_operation(&mut w, &Operation::remove_trustline(usdc())).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 0, 0, 0, 6]);
        assert_eq!(&bytes[bytes.len() - 8..], &0i64.to_be_bytes());
    }

    #[test]
    fn payment_transaction_length() {
        let tx = Transaction {
            source: AccountAddress::new(ISSUER),
            fee: 100,
            sequence: 42,
            time_bounds: Some(TimeBounds {
                min_time: 0,
                max_time: 1_700_000_030,
            }),
            memo: Memo::None,
            operations: vec![Operation::payment(
                AccountAddress::new(ISSUER),
                Asset::Native,
                Amount::from_units(1),
            )],
        };
        let bytes = encode_transaction(&tx).unwrap();
        // source 36, fee 4, seq 8, cond 20, memo 4, count 4, op 56, ext 4
        assert_eq!(bytes.len(), 136);
        assert_eq!(&bytes[40..48], &42i64.to_be_bytes());
    }
}
