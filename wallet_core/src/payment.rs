//! Payment validation and execution.
//!
//! [`validate_payment`] runs the same checks for real and simulated sends,
//! in a fixed order, before anything leaves the process:
//!
//! 1. destination address format
//! 2. amount is a positive decimal
//! 3. issued-asset sends need the sender's trustline
//! 4. amount does not exceed the sender's balance
//!
//! followed by the memo length check.

use std::fmt;

use pocket_horizon::SubmitFailure;
use pocket_transactions::{Memo, Operation};
use pocket_types::{AccountAddress, Amount, AssetKind, NetworkId};
use serde::{Deserialize, Serialize};

use crate::account::AccountSnapshot;
use crate::receipt::Receipt;
use crate::session::UnlockedKeypair;
use crate::simulator::SimulatedExecutor;
use crate::submitter::Submitter;
use crate::WalletError;

/// A send as entered by the user. The signing key comes from the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub destination: String,
    /// Decimal amount, e.g. `"3.5"`.
    pub amount: String,
    pub asset: AssetKind,
    #[serde(default)]
    pub memo: Option<String>,
}

impl PaymentRequest {
    pub fn new(destination: impl Into<String>, amount: impl Into<String>, asset: AssetKind) -> Self {
        Self {
            destination: destination.into(),
            amount: amount.into(),
            asset,
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// How strictly the destination is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressPolicy {
    /// Full account-id check, including the checksum.
    Strict,
    /// Any non-blank string (demo mode).
    Relaxed,
}

/// A request that passed every local check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedPayment {
    pub destination: AccountAddress,
    pub amount: Amount,
    pub asset: AssetKind,
    pub memo: Memo,
}

/// Steps 1 and 2, which need no account state.
fn check_destination_and_amount(
    request: &PaymentRequest,
    policy: AddressPolicy,
) -> Result<(AccountAddress, Amount), WalletError> {
    let destination = request.destination.trim();
    let address_ok = match policy {
        AddressPolicy::Strict => pocket_crypto::validate_address(destination),
        AddressPolicy::Relaxed => !destination.is_empty(),
    };
    if !address_ok {
        return Err(WalletError::InvalidAddress(request.destination.clone()));
    }

    let amount: Amount = request
        .amount
        .trim()
        .parse()
        .map_err(|e| WalletError::InvalidAmount(format!("{:?}: {e}", request.amount)))?;
    if !amount.is_positive() {
        return Err(WalletError::InvalidAmount(format!(
            "{:?}: must be greater than zero",
            request.amount
        )));
    }
    Ok((AccountAddress::new(destination), amount))
}

pub fn validate_payment(
    request: &PaymentRequest,
    snapshot: &AccountSnapshot,
    policy: AddressPolicy,
) -> Result<ValidatedPayment, WalletError> {
    let (destination, amount) = check_destination_and_amount(request, policy)?;

    if request.asset == AssetKind::Issued && !snapshot.has_issued_trustline {
        return Err(WalletError::TrustlineRequired);
    }

    let available = snapshot.balance_of(request.asset);
    if amount > available {
        return Err(WalletError::InsufficientBalance {
            asset: request.asset.code(),
            needed: amount,
            available,
        });
    }

    let memo = Memo::text(request.memo.as_deref().unwrap_or(""))
        .map_err(|e| WalletError::InvalidMemo(e.to_string()))?;

    Ok(ValidatedPayment {
        destination,
        amount,
        asset: request.asset,
        memo,
    })
}

/// Where a send attempt is in its lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendPhase {
    Idle,
    Validating,
    Rejected(WalletError),
    Submitting,
    Confirmed(Receipt),
    Failed(WalletError),
}

impl SendPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::Confirmed(_) | Self::Failed(_))
    }
}

impl fmt::Display for SendPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Validating => f.write_str("validating"),
            Self::Rejected(e) => write!(f, "rejected ({e})"),
            Self::Submitting => f.write_str("submitting"),
            Self::Confirmed(r) => write!(f, "confirmed ({})", r.id),
            Self::Failed(e) => write!(f, "failed ({e})"),
        }
    }
}

/// Phase history of one send. No attempt is ever retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendAttempt {
    phases: Vec<SendPhase>,
    simulated: bool,
}

impl SendAttempt {
    fn new(simulated: bool) -> Self {
        Self {
            phases: vec![SendPhase::Idle],
            simulated,
        }
    }

    fn advance(&mut self, phase: SendPhase) {
        tracing::debug!(phase = %phase, simulated = self.simulated, "send phase");
        self.phases.push(phase);
    }

    /// Record the outcome of `result` as the terminal phase.
    fn finish(&mut self, result: &Result<Receipt, WalletError>) {
        match result {
            Ok(receipt) => self.advance(SendPhase::Confirmed(receipt.clone())),
            Err(e) => self.advance(SendPhase::Failed(e.clone())),
        }
    }

    pub fn current(&self) -> &SendPhase {
        // `phases` always starts with Idle.
        self.phases.last().unwrap_or(&SendPhase::Idle)
    }

    pub fn phases(&self) -> &[SendPhase] {
        &self.phases
    }

    pub fn is_simulated(&self) -> bool {
        self.simulated
    }
}

/// Map a rejected payment to the error the user sees.
fn classify_payment_failure(failure: SubmitFailure, payment: &ValidatedPayment, available: Amount) -> WalletError {
    match failure {
        SubmitFailure::NoTrust => WalletError::RecipientTrustlineMissing,
        SubmitFailure::SourceNoTrust => WalletError::TrustlineRequired,
        SubmitFailure::Underfunded | SubmitFailure::LowReserve => WalletError::InsufficientBalance {
            asset: payment.asset.code(),
            needed: payment.amount,
            available,
        },
        other => WalletError::SubmissionFailed(other.to_string()),
    }
}

/// Drives payments from validation to confirmation.
pub struct PaymentOrchestrator {
    submitter: Submitter,
    network: NetworkId,
    last_attempt: Option<SendAttempt>,
}

impl PaymentOrchestrator {
    pub(crate) fn new(submitter: Submitter, network: NetworkId) -> Self {
        Self {
            submitter,
            network,
            last_attempt: None,
        }
    }

    pub fn last_attempt(&self) -> Option<&SendAttempt> {
        self.last_attempt.as_ref()
    }

    /// Run the checks that need no snapshot, so a malformed request is
    /// rejected before the account is fetched.
    pub fn precheck(&mut self, request: &PaymentRequest) -> Result<(), WalletError> {
        if let Err(e) = check_destination_and_amount(request, AddressPolicy::Strict) {
            let mut attempt = SendAttempt::new(false);
            attempt.advance(SendPhase::Validating);
            attempt.advance(SendPhase::Rejected(e.clone()));
            self.last_attempt = Some(attempt);
            return Err(e);
        }
        Ok(())
    }

    /// Validate against `snapshot`, then sign and submit one payment.
    pub async fn send(
        &mut self,
        request: &PaymentRequest,
        snapshot: &AccountSnapshot,
        signer: &UnlockedKeypair,
    ) -> Result<Receipt, WalletError> {
        let mut attempt = SendAttempt::new(false);
        attempt.advance(SendPhase::Validating);
        let payment = match validate_payment(request, snapshot, AddressPolicy::Strict) {
            Ok(payment) => payment,
            Err(e) => {
                attempt.advance(SendPhase::Rejected(e.clone()));
                self.last_attempt = Some(attempt);
                return Err(e);
            }
        };

        attempt.advance(SendPhase::Submitting);
        let asset = match payment.asset {
            AssetKind::Native => pocket_types::Asset::Native,
            AssetKind::Issued => self.network.issued_asset(),
        };
        let available = snapshot.balance_of(payment.asset);
        let operation = Operation::payment(payment.destination.clone(), asset, payment.amount);
        let result = self
            .submitter
            .submit(signer, operation, payment.memo.clone(), |failure| {
                classify_payment_failure(failure, &payment, available)
            })
            .await;

        attempt.finish(&result);
        self.last_attempt = Some(attempt);
        if let Ok(receipt) = &result {
            tracing::info!(
                amount = %payment.amount,
                asset = payment.asset.code(),
                to = %pocket_utils::short_id(payment.destination.as_str()),
                hash = %receipt.id,
                "payment sent"
            );
        }
        result
    }

    /// Same validation, but executed against the demo projection.
    pub async fn send_simulated(
        &mut self,
        request: &PaymentRequest,
        executor: &mut SimulatedExecutor,
    ) -> Result<Receipt, WalletError> {
        let mut attempt = SendAttempt::new(true);
        attempt.advance(SendPhase::Validating);
        let payment = match validate_payment(request, executor.snapshot(), AddressPolicy::Relaxed) {
            Ok(payment) => payment,
            Err(e) => {
                attempt.advance(SendPhase::Rejected(e.clone()));
                self.last_attempt = Some(attempt);
                return Err(e);
            }
        };

        attempt.advance(SendPhase::Submitting);
        let result = Ok(executor.execute(&payment).await);
        attempt.finish(&result);
        self.last_attempt = Some(attempt);
        result
    }
}
