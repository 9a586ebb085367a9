//! Assets: the native asset and issued credit assets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{AccountAddress, ParseError};

/// Which of the wallet's two assets a request refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// The network's native asset (XLM).
    Native,
    /// The configured issued asset (USDC from the network's issuer).
    Issued,
}

impl AssetKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Native => "XLM",
            Self::Issued => "USDC",
        }
    }
}

impl FromStr for AssetKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "XLM" | "NATIVE" => Ok(Self::Native),
            "USDC" | "ISSUED" => Ok(Self::Issued),
            _ => Err(ParseError::InvalidAssetCode(s.to_string())),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An issued asset code: 1–12 ASCII alphanumerics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetCode(pub(crate) String);

impl AssetCode {
    pub const MAX_LEN: usize = 12;

    pub fn new(code: &str) -> Result<Self, ParseError> {
        if code.is_empty()
            || code.len() > Self::MAX_LEN
            || !code.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(ParseError::InvalidAssetCode(code.to_string()));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Codes of up to 4 characters use the short (alphanum4) encoding.
    pub fn is_short(&self) -> bool {
        self.0.len() <= 4
    }
}

impl fmt::Display for AssetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A concrete asset as it appears on the network.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    Native,
    Credit {
        code: AssetCode,
        issuer: AccountAddress,
    },
}

impl Asset {
    pub fn credit(code: AssetCode, issuer: AccountAddress) -> Self {
        Self::Credit { code, issuer }
    }

    /// Whether a balance line `(code, issuer)` refers to this asset.
    pub fn matches(&self, code: Option<&str>, issuer: Option<&str>) -> bool {
        match self {
            Self::Native => code.is_none() && issuer.is_none(),
            Self::Credit {
                code: own_code,
                issuer: own_issuer,
            } => code == Some(own_code.as_str()) && issuer == Some(own_issuer.as_str()),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("XLM"),
            Self::Credit { code, issuer } => write!(f, "{code}:{issuer}"),
        }
    }
}
