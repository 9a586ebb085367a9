use thiserror::Error;

use crate::SubmitFailure;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("account not found")]
    NotFound,

    #[error("network unavailable: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("transaction rejected: {0}")]
    Rejected(SubmitFailure),

    #[error("funding request refused: {0}")]
    FundingRefused(String),
}
