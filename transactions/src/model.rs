//! Transaction and operation model.

use pocket_types::{AccountAddress, Amount, Asset, Timestamp};
use serde::{Deserialize, Serialize};

use crate::TransactionError;

/// Longest text memo the network accepts, in bytes.
pub const MAX_MEMO_TEXT_LEN: usize = 28;

/// Limit used when opening a trustline: the largest representable amount.
pub const TRUSTLINE_MAX_LIMIT: i64 = i64::MAX;

/// Operations per transaction accepted by the network.
pub const MAX_OPERATIONS: usize = 100;

/// Optional note attached to a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Memo {
    #[default]
    None,
    Text(String),
}

impl Memo {
    /// A text memo; empty text means no memo.
    pub fn text(text: &str) -> Result<Self, TransactionError> {
        if text.is_empty() {
            return Ok(Self::None);
        }
        if text.len() > MAX_MEMO_TEXT_LEN {
            return Err(TransactionError::MemoTooLong {
                len: text.len(),
                max: MAX_MEMO_TEXT_LEN,
            });
        }
        Ok(Self::Text(text.to_string()))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Text(t) => Some(t),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Payment {
        destination: AccountAddress,
        asset: Asset,
        amount: Amount,
    },
    /// `limit` 0 removes the trustline.
    ChangeTrust { asset: Asset, limit: i64 },
}

impl Operation {
    pub fn payment(destination: AccountAddress, asset: Asset, amount: Amount) -> Self {
        Self::Payment {
            destination,
            asset,
            amount,
        }
    }

    pub fn add_trustline(asset: Asset) -> Self {
        Self::ChangeTrust {
            asset,
            limit: TRUSTLINE_MAX_LIMIT,
        }
    }

    pub fn remove_trustline(asset: Asset) -> Self {
        Self::ChangeTrust { asset, limit: 0 }
    }

    pub(crate) fn check(&self) -> Result<(), TransactionError> {
        match self {
            Self::Payment { amount, .. } if !amount.is_positive() => {
                Err(TransactionError::NonPositiveAmount)
            }
            Self::ChangeTrust { limit, .. } if *limit < 0 => Err(TransactionError::NegativeLimit),
            _ => Ok(()),
        }
    }
}

/// Validity window of a transaction, in Unix seconds. `max_time` 0 means open-ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

impl TimeBounds {
    /// Valid from the epoch until `now + secs`.
    pub fn expiring_after(now: Timestamp, secs: u64) -> Self {
        Self {
            min_time: 0,
            max_time: now.plus_secs(secs).as_secs(),
        }
    }
}

/// An unsigned transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub source: AccountAddress,
    /// Total fee in stroops (base fee × operation count).
    pub fee: u32,
    /// The sequence number this transaction consumes.
    pub sequence: i64,
    pub time_bounds: Option<TimeBounds>,
    pub memo: Memo,
    pub operations: Vec<Operation>,
}
