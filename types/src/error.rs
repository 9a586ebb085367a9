//! Parse errors for the textual forms of the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount has more than 7 decimal places: {0}")]
    TooPrecise(String),

    #[error("amount out of range: {0}")]
    AmountOverflow(String),

    #[error("invalid asset code: {0}")]
    InvalidAssetCode(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),
}
