//! Ledger transactions the wallet submits.
//!
//! Operation types:
//! - **Payment**: move an asset (native or issued) to another account
//! - **ChangeTrust**: open (limit > 0) or close (limit 0) a trustline
//!
//! Transactions are built with [`TransactionBuilder`], encoded as XDR by the
//! [`xdr`] module and signed into a [`SignedEnvelope`] whose base64 form is
//! what the network accepts.

pub mod builder;
pub mod envelope;
pub mod error;
pub mod model;
pub mod xdr;

pub use builder::{TransactionBuilder, BASE_FEE, DEFAULT_TIMEOUT_SECS};
pub use envelope::SignedEnvelope;
pub use error::TransactionError;
pub use model::{Memo, Operation, TimeBounds, Transaction, MAX_MEMO_TEXT_LEN, TRUSTLINE_MAX_LIMIT};
