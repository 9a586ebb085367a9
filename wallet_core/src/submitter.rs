//! Build, sign and submit one-operation transactions.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pocket_horizon::{LedgerClient, LedgerError, SubmitFailure};
use pocket_transactions::{
    Memo, Operation, SignedEnvelope, TransactionBuilder, TransactionError, DEFAULT_TIMEOUT_SECS,
};
use pocket_types::{Clock, NetworkId};

use crate::receipt::Receipt;
use crate::session::UnlockedKeypair;
use crate::WalletError;

/// Await `fut`, failing with a transport error once `timeout` elapses.
pub(crate) async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, LedgerError>
where
    F: Future<Output = Result<T, LedgerError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(LedgerError::Transport(format!(
            "no response within {}s",
            timeout.as_secs()
        ))),
    }
}

/// Shared by every operation that writes to the ledger.
#[derive(Clone)]
pub(crate) struct Submitter {
    ledger: Arc<dyn LedgerClient>,
    clock: Arc<dyn Clock>,
    network: NetworkId,
    timeout: Duration,
}

impl Submitter {
    pub(crate) fn new(
        ledger: Arc<dyn LedgerClient>,
        clock: Arc<dyn Clock>,
        network: NetworkId,
        timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            clock,
            network,
            timeout,
        }
    }

    /// Submit `operation` from `signer`'s account.
    ///
    /// `classify` turns a network rejection into the caller's error kind;
    /// every other failure maps through `From<LedgerError>`.
    pub(crate) async fn submit(
        &self,
        signer: &UnlockedKeypair,
        operation: Operation,
        memo: Memo,
        classify: impl FnOnce(SubmitFailure) -> WalletError,
    ) -> Result<Receipt, WalletError> {
        let source = signer.address().clone();
        let account = match bounded(self.timeout, self.ledger.load_account(&source)).await {
            Ok(account) => account,
            // The source has never been funded, so it cannot pay anything.
            Err(LedgerError::NotFound) => return Err(classify(SubmitFailure::Underfunded)),
            Err(e) => return Err(e.into()),
        };

        let transaction = TransactionBuilder::new(source, account.sequence)
            .memo(memo)
            .timeout(self.clock.now(), DEFAULT_TIMEOUT_SECS)
            .add_operation(operation)
            .build()
            .map_err(build_error)?;
        let envelope = SignedEnvelope::sign(transaction, self.network.passphrase(), signer.keypair())
            .map_err(build_error)?;

        tracing::debug!(
            hash = %envelope.hash,
            sequence = envelope.transaction.sequence,
            "submitting transaction"
        );

        let response = match bounded(
            self.timeout,
            self.ledger.submit_transaction(&envelope.to_xdr_base64()),
        )
        .await
        {
            Ok(response) => response,
            Err(LedgerError::Rejected(failure)) => {
                tracing::warn!(hash = %envelope.hash, reason = %failure, "transaction rejected");
                return Err(classify(failure));
            }
            Err(e) => return Err(e.into()),
        };

        if !response.successful {
            return Err(classify(SubmitFailure::Other(
                "transaction was not successful".to_string(),
            )));
        }

        tracing::info!(hash = %response.hash, ledger = response.ledger, "transaction confirmed");
        Ok(Receipt {
            id: response.hash,
            ledger: response.ledger,
            confirmed_at: self.clock.now(),
            simulated: false,
        })
    }
}

fn build_error(e: TransactionError) -> WalletError {
    match e {
        TransactionError::InvalidAccount(account) => WalletError::InvalidAddress(account),
        TransactionError::MemoTooLong { .. } => WalletError::InvalidMemo(e.to_string()),
        TransactionError::NonPositiveAmount => WalletError::InvalidAmount(e.to_string()),
        other => WalletError::SubmissionFailed(other.to_string()),
    }
}
