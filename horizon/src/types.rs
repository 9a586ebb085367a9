//! Records returned by the ledger network.

use chrono::{DateTime, Utc};
use pocket_types::{Amount, Asset, ParseError};
use serde::{Deserialize, Deserializer, Serialize};

/// One balance entry of an account: native, or a trustline to an issued asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLine {
    pub asset_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_issuer: Option<String>,
    /// Decimal string with seven fractional digits, e.g. `"10.5000000"`.
    pub balance: String,
}

impl BalanceLine {
    pub const NATIVE_TYPE: &'static str = "native";

    pub fn native(balance: Amount) -> Self {
        Self {
            asset_type: Self::NATIVE_TYPE.to_string(),
            asset_code: None,
            asset_issuer: None,
            balance: balance.to_fixed_string(),
        }
    }

    /// A trustline line for a credit asset. Native assets map to [`BalanceLine::native`].
    pub fn trustline(asset: &Asset, balance: Amount) -> Self {
        match asset {
            Asset::Native => Self::native(balance),
            Asset::Credit { code, issuer } => Self {
                asset_type: if code.is_short() {
                    "credit_alphanum4".to_string()
                } else {
                    "credit_alphanum12".to_string()
                },
                asset_code: Some(code.to_string()),
                asset_issuer: Some(issuer.to_string()),
                balance: balance.to_fixed_string(),
            },
        }
    }

    pub fn is_native(&self) -> bool {
        self.asset_type == Self::NATIVE_TYPE
    }

    pub fn is_asset(&self, asset: &Asset) -> bool {
        match asset {
            Asset::Native => self.is_native(),
            Asset::Credit { .. } => {
                !self.is_native()
                    && asset.matches(self.asset_code.as_deref(), self.asset_issuer.as_deref())
            }
        }
    }

    pub fn amount(&self) -> Result<Amount, ParseError> {
        self.balance.parse()
    }
}

/// A live account as reported by the network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    /// Horizon renders the sequence as a string to keep 64-bit precision.
    #[serde(deserialize_with = "i64_from_str_or_int")]
    pub sequence: i64,
    #[serde(default)]
    pub subentry_count: u32,
    pub balances: Vec<BalanceLine>,
}

impl AccountRecord {
    /// Number of trustline entries (every non-native balance line).
    pub fn trustline_count(&self) -> u32 {
        self.balances.iter().filter(|b| !b.is_native()).count() as u32
    }
}

/// Outcome of an accepted submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub hash: String,
    pub ledger: u32,
    #[serde(default = "default_true")]
    pub successful: bool,
}

/// A transaction in an account's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default = "default_true")]
    pub successful: bool,
}

/// Listing order for history queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

fn default_true() -> bool {
    true
}

fn i64_from_str_or_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
        Raw::Int(n) => Ok(n),
    }
}
