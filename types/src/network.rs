//! Network identifier and the per-network constants that hang off it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{AccountAddress, Asset, AssetCode, ParseError};

/// Code of the issued asset every wallet can hold a trustline for.
pub const ISSUED_ASSET_CODE: &str = "USDC";

/// Identifies which network the wallet talks to.
///
/// Chosen once at startup; switching networks means rebuilding every component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    /// The public test network (friendbot funding available).
    #[serde(rename = "testnet")]
    Test,
    /// The production network.
    #[serde(rename = "mainnet")]
    Main,
}

impl NetworkId {
    /// Passphrase mixed into every transaction hash.
    pub fn passphrase(&self) -> &'static str {
        match self {
            Self::Test => "Test SDF Network ; September 2015",
            Self::Main => "Public Global Stellar Network ; September 2015",
        }
    }

    /// Default Horizon API endpoint.
    pub fn horizon_url(&self) -> &'static str {
        match self {
            Self::Test => "https://horizon-testnet.stellar.org",
            Self::Main => "https://horizon.stellar.org",
        }
    }

    /// Faucet endpoint; only the test network has one.
    pub fn friendbot_url(&self) -> Option<&'static str> {
        match self {
            Self::Test => Some("https://friendbot.stellar.org"),
            Self::Main => None,
        }
    }

    /// Issuer of the issued asset on this network.
    pub fn issuer(&self) -> AccountAddress {
        AccountAddress::new(match self {
            Self::Test => "GBBD47IF6LWK7P7MDEVSCWR7DPUWV3NY3DTQEVFL4NAT4AQH3ZLLFLA5",
            Self::Main => "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN",
        })
    }

    /// The issued asset (code + this network's issuer).
    pub fn issued_asset(&self) -> Asset {
        Asset::Credit {
            code: AssetCode(ISSUED_ASSET_CODE.to_string()),
            issuer: self.issuer(),
        }
    }

    /// Human-readable name, matching the persisted settings value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "testnet",
            Self::Main => "mainnet",
        }
    }
}

impl FromStr for NetworkId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "test" | "testnet" => Ok(Self::Test),
            "main" | "mainnet" | "public" | "live" => Ok(Self::Main),
            _ => Err(ParseError::UnknownNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
