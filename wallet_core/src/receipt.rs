//! Results handed back to the caller after a send or a history query.

use chrono::{DateTime, Utc};
use pocket_horizon::TransactionRecord;
use pocket_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Proof that a payment was confirmed (or, in demo mode, pretended to be).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Transaction hash, hex.
    pub id: String,
    /// Ledger that included the transaction; 0 for simulated sends.
    pub ledger: u32,
    pub confirmed_at: Timestamp,
    pub simulated: bool,
}

/// One entry of the recent-activity list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub memo: Option<String>,
    pub successful: bool,
}

impl From<TransactionRecord> for TransactionSummary {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            memo: record.memo,
            successful: record.successful,
        }
    }
}
