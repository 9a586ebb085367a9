//! Fundamental types for the Pocket wallet.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account addresses, fixed-point amounts, assets, key material, network ids,
//! transaction hashes and timestamps.

pub mod address;
pub mod amount;
pub mod asset;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod time;

pub use address::AccountAddress;
pub use amount::Amount;
pub use asset::{Asset, AssetCode, AssetKind};
pub use error::ParseError;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::NetworkId;
pub use time::{Clock, SystemClock, Timestamp};
