//! Account address type (StrKey `G…` form).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A network account address in StrKey form, e.g. `GBBD47IF6LWK…`.
///
/// This type only carries the string. Format and checksum validation live in
/// `pocket_crypto::validate_address`, which needs no network access.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountAddress(String);

impl AccountAddress {
    /// The leading character of every account address.
    pub const PREFIX: char = 'G';

    /// Length of an encoded account address.
    pub const LEN: usize = 56;

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cheap shape check (prefix and length); does not verify the checksum.
    pub fn looks_valid(&self) -> bool {
        self.0.len() == Self::LEN && self.0.starts_with(Self::PREFIX)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AccountAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
