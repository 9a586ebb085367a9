use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("invalid account id: {0}")]
    InvalidAccount(String),

    #[error("memo text is {len} bytes, limit is {max}")]
    MemoTooLong { len: usize, max: usize },

    #[error("transaction has no operations")]
    NoOperations,

    #[error("transaction has {0} operations, limit is 100")]
    TooManyOperations(usize),

    #[error("payment amount must be positive")]
    NonPositiveAmount,

    #[error("trustline limit must not be negative")]
    NegativeLimit,

    #[error("sequence number overflow")]
    SequenceOverflow,

    #[error("fee overflow")]
    FeeOverflow,
}
