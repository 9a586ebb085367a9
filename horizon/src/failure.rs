//! Classification of rejected submissions.
//!
//! Horizon reports why a transaction failed through `extras.result_codes`:
//! one code for the transaction and one per operation. [`from_result_codes`]
//! is the single place those codes are mapped. When a response carries no
//! result codes, [`from_message`] inspects the human-readable text instead;
//! nothing outside this module matches on message strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the network refused a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitFailure {
    /// The destination holds no trustline for the asset.
    NoTrust,
    /// The sending account itself holds no trustline for the asset.
    SourceNoTrust,
    /// The source lacks the balance for the payment plus fee.
    Underfunded,
    /// The operation would leave the account below its minimum reserve.
    LowReserve,
    /// The sequence number was stale.
    BadSequence,
    Other(String),
}

impl fmt::Display for SubmitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTrust => f.write_str("missing trustline"),
            Self::SourceNoTrust => f.write_str("source has no trustline"),
            Self::Underfunded => f.write_str("insufficient balance"),
            Self::LowReserve => f.write_str("below minimum reserve"),
            Self::BadSequence => f.write_str("bad sequence number"),
            Self::Other(detail) => f.write_str(detail),
        }
    }
}

/// Map Horizon result codes to a failure. Operation codes take precedence
/// over the transaction code, which is usually the generic `tx_failed`.
pub fn from_result_codes(transaction: Option<&str>, operations: &[String]) -> SubmitFailure {
    for code in operations {
        match code.as_str() {
            "op_no_trust" | "op_not_authorized" => return SubmitFailure::NoTrust,
            "op_src_no_trust" | "op_src_not_authorized" => return SubmitFailure::SourceNoTrust,
            "op_underfunded" => return SubmitFailure::Underfunded,
            "op_low_reserve" => return SubmitFailure::LowReserve,
            _ => {}
        }
    }

    match transaction {
        Some("tx_bad_seq") => SubmitFailure::BadSequence,
        Some("tx_insufficient_balance") => SubmitFailure::Underfunded,
        Some(tx) => {
            let mut detail = tx.to_string();
            if !operations.is_empty() {
                detail.push_str(": ");
                detail.push_str(&operations.join(", "));
            }
            SubmitFailure::Other(detail)
        }
        None if operations.is_empty() => SubmitFailure::Other("rejected".to_string()),
        None => SubmitFailure::Other(operations.join(", ")),
    }
}

/// Fallback classification from free text, for responses without result codes.
pub fn from_message(message: &str) -> SubmitFailure {
    let lower = message.to_ascii_lowercase();
    if lower.contains("no_trust") || lower.contains("trustline") {
        SubmitFailure::NoTrust
    } else if lower.contains("low_reserve") || lower.contains("reserve") {
        SubmitFailure::LowReserve
    } else if lower.contains("underfunded") || lower.contains("insufficient") {
        SubmitFailure::Underfunded
    } else if lower.contains("bad_seq") {
        SubmitFailure::BadSequence
    } else {
        SubmitFailure::Other(message.to_string())
    }
}

#[derive(Deserialize)]
struct ProblemBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    extras: Option<ProblemExtras>,
}

#[derive(Deserialize)]
struct ProblemExtras {
    #[serde(default)]
    result_codes: Option<ResultCodes>,
}

#[derive(Deserialize)]
struct ResultCodes {
    #[serde(default)]
    transaction: Option<String>,
    #[serde(default)]
    operations: Vec<String>,
}

/// Classify the body of a failed submission response.
pub fn from_response_body(body: &str) -> SubmitFailure {
    let Ok(problem) = serde_json::from_str::<ProblemBody>(body) else {
        return from_message(body);
    };

    if let Some(codes) = problem.extras.and_then(|e| e.result_codes) {
        return from_result_codes(codes.transaction.as_deref(), &codes.operations);
    }

    let text = problem.detail.or(problem.title).unwrap_or_default();
    from_message(&text)
}
