//! Fluent construction of [`Transaction`]s.

use pocket_types::{AccountAddress, Timestamp};

use crate::model::{Memo, Operation, TimeBounds, Transaction, MAX_OPERATIONS};
use crate::TransactionError;

/// Minimum fee per operation, in stroops.
pub const BASE_FEE: u32 = 100;

/// Validity window applied to every transaction unless overridden.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builds a transaction for a source account at a known sequence number.
///
/// `current_sequence` is the account's sequence as last loaded from the
/// network; the built transaction consumes `current_sequence + 1`.
#[derive(Debug)]
pub struct TransactionBuilder {
    source: AccountAddress,
    current_sequence: i64,
    base_fee: u32,
    memo: Memo,
    time_bounds: Option<TimeBounds>,
    operations: Vec<Operation>,
}

impl TransactionBuilder {
    pub fn new(source: AccountAddress, current_sequence: i64) -> Self {
        Self {
            source,
            current_sequence,
            base_fee: BASE_FEE,
            memo: Memo::None,
            time_bounds: None,
            operations: Vec::new(),
        }
    }

    pub fn base_fee(mut self, fee: u32) -> Self {
        self.base_fee = fee;
        self
    }

    pub fn memo(mut self, memo: Memo) -> Self {
        self.memo = memo;
        self
    }

    /// Expire the transaction `secs` after `now`.
    pub fn timeout(mut self, now: Timestamp, secs: u64) -> Self {
        self.time_bounds = Some(TimeBounds::expiring_after(now, secs));
        self
    }

    pub fn add_operation(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    pub fn build(self) -> Result<Transaction, TransactionError> {
        if !pocket_crypto::validate_address(self.source.as_str()) {
            return Err(TransactionError::InvalidAccount(self.source.to_string()));
        }
        if self.operations.is_empty() {
            return Err(TransactionError::NoOperations);
        }
        if self.operations.len() > MAX_OPERATIONS {
            return Err(TransactionError::TooManyOperations(self.operations.len()));
        }
        for op in &self.operations {
            op.check()?;
        }

        let fee = self
            .base_fee
            .checked_mul(self.operations.len() as u32)
            .ok_or(TransactionError::FeeOverflow)?;
        let sequence = self
            .current_sequence
            .checked_add(1)
            .ok_or(TransactionError::SequenceOverflow)?;

        Ok(Transaction {
            source: self.source,
            fee,
            sequence,
            time_bounds: self.time_bounds,
            memo: self.memo,
            operations: self.operations,
        })
    }
}
