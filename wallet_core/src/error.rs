use pocket_horizon::LedgerError;
use pocket_store::StoreError;
use pocket_types::Amount;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("incorrect PIN")]
    InvalidPin,

    #[error("no wallet found on this device")]
    NoWalletFound,

    #[error("a wallet already exists on this device")]
    WalletAlreadyExists,

    #[error("wallet is locked")]
    WalletLocked,

    #[error("storage failure: {0}")]
    StorageFailure(String),

    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("account not found on the network")]
    AccountNotFound,

    #[error("invalid recipient address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid memo: {0}")]
    InvalidMemo(String),

    #[error("add the USDC trustline first")]
    TrustlineRequired,

    #[error("recipient does not accept this asset")]
    RecipientTrustlineMissing,

    #[error("insufficient {asset} balance: need {needed}, have {available}")]
    InsufficientBalance {
        asset: &'static str,
        needed: Amount,
        available: Amount,
    },

    #[error("insufficient XLM reserve: need {needed}, have {available}")]
    InsufficientReserve { needed: Amount, available: Amount },

    #[error("USDC is already enabled on this wallet")]
    AlreadyTrusted,

    #[error("trustline still holds {0} USDC")]
    TrustlineNotEmpty(Amount),

    #[error("transaction failed: {0}")]
    SubmissionFailed(String),

    #[error("funding unavailable: {0}")]
    FundingUnavailable(String),

    #[error("invalid backup phrase")]
    InvalidBackupPhrase,

    #[error("could not generate a wallet key: {0}")]
    KeyGeneration(String),

    #[error("{0} is not available in demo mode")]
    UnavailableInDemo(&'static str),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<StoreError> for WalletError {
    fn from(e: StoreError) -> Self {
        WalletError::StorageFailure(e.to_string())
    }
}

/// Context-free mapping. Submission paths classify [`LedgerError::Rejected`]
/// themselves before falling back to this.
impl From<LedgerError> for WalletError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NotFound => WalletError::AccountNotFound,
            LedgerError::Transport(m) | LedgerError::InvalidResponse(m) => {
                WalletError::NetworkUnavailable(m)
            }
            LedgerError::Rejected(failure) => WalletError::SubmissionFailed(failure.to_string()),
            LedgerError::FundingRefused(m) => WalletError::FundingUnavailable(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocket_horizon::SubmitFailure;

    #[test]
    fn ledger_errors_map_to_kinds() {
        assert_eq!(WalletError::from(LedgerError::NotFound), WalletError::AccountNotFound);
        assert!(matches!(
            WalletError::from(LedgerError::Transport("reset".into())),
            WalletError::NetworkUnavailable(_)
        ));
        assert_eq!(
            WalletError::from(LedgerError::Rejected(SubmitFailure::BadSequence)),
            WalletError::SubmissionFailed("bad sequence number".into())
        );
    }

    #[test]
    fn display_is_human_readable() {
        let err = WalletError::InsufficientBalance {
            asset: "XLM",
            needed: Amount::from_units(5),
            available: Amount::from_stroops(25_000_000),
        };
        assert_eq!(err.to_string(), "insufficient XLM balance: need 5, have 2.5");
        assert_eq!(
            WalletError::KeyGeneration("entropy source unavailable".into()).to_string(),
            "could not generate a wallet key: entropy source unavailable"
        );
    }
}
