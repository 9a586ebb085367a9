//! Fixed-point asset amounts.
//!
//! Amounts are represented as signed 64-bit counts of stroops, the network's
//! smallest unit (1 unit = 10^7 stroops), to avoid floating-point errors.
//! The textual form is a plain decimal string with at most 7 fractional digits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::ParseError;

/// Number of decimal places carried by every amount.
pub const DECIMALS: u32 = 7;

/// Stroops per whole unit.
pub const STROOPS_PER_UNIT: i64 = 10_000_000;

/// An asset amount in stroops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub const fn from_stroops(stroops: i64) -> Self {
        Self(stroops)
    }

    /// Whole units, e.g. `Amount::from_units(2)` is `2.0000000`.
    pub const fn from_units(units: i64) -> Self {
        Self(units * STROOPS_PER_UNIT)
    }

    pub const fn stroops(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn checked_mul(self, factor: i64) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Render with all 7 decimal places (`"10.5000000"`), the form the
    /// network API uses for balances.
    pub fn to_fixed_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = STROOPS_PER_UNIT as u64;
        format!("{sign}{}.{:07}", abs / unit, abs % unit)
    }
}

impl FromStr for Amount {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseError::InvalidAmount(s.to_string()));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ParseError::InvalidAmount(s.to_string()));
        }
        if fraction.len() > DECIMALS as usize {
            return Err(ParseError::TooPrecise(s.to_string()));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| ParseError::AmountOverflow(s.to_string()))?
        };

        let mut fraction_value: i64 = 0;
        for (i, b) in fraction.bytes().enumerate() {
            let digit = i64::from(b - b'0');
            fraction_value += digit * 10_i64.pow(DECIMALS - 1 - i as u32);
        }

        let stroops = whole_value
            .checked_mul(STROOPS_PER_UNIT)
            .and_then(|v| v.checked_add(fraction_value))
            .ok_or_else(|| ParseError::AmountOverflow(s.to_string()))?;

        Ok(Self(if negative { -stroops } else { stroops }))
    }
}

impl TryFrom<String> for Amount {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_fixed_string()
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

/// Trailing zeros are trimmed: `10.5`, `7.5`, `15`.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixed = self.to_fixed_string();
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        f.write_str(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!("10.5".parse::<Amount>().unwrap().stroops(), 105_000_000);
        assert_eq!("3".parse::<Amount>().unwrap(), Amount::from_units(3));
        assert_eq!("0.0000001".parse::<Amount>().unwrap().stroops(), 1);
        assert_eq!(".5".parse::<Amount>().unwrap().stroops(), 5_000_000);
        assert_eq!(" 2.25 ".parse::<Amount>().unwrap().stroops(), 22_500_000);
    }

    #[test]
    fn parses_negative_amounts() {
        assert_eq!("-1".parse::<Amount>().unwrap(), Amount::from_units(-1));
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<Amount>().is_err());
        assert!(".".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
        assert!("1.2.3".parse::<Amount>().is_err());
        assert!("1e5".parse::<Amount>().is_err());
    }

    #[test]
    fn rejects_more_than_seven_decimals() {
        assert!(matches!(
            "0.00000001".parse::<Amount>(),
            Err(ParseError::TooPrecise(_))
        ));
    }

    #[test]
    fn rejects_overflow() {
        assert!(matches!(
            "99999999999999999999".parse::<Amount>(),
            Err(ParseError::AmountOverflow(_))
        ));
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Amount::from_stroops(105_000_000).to_string(), "10.5");
        assert_eq!(Amount::from_units(15).to_string(), "15");
        assert_eq!(Amount::ZERO.to_string(), "0");
        assert_eq!(Amount::from_stroops(-75_000_000).to_string(), "-7.5");
    }

    #[test]
    fn fixed_string_has_seven_places() {
        assert_eq!(Amount::from_stroops(105_000_000).to_fixed_string(), "10.5000000");
        assert_eq!(Amount::from_stroops(1).to_fixed_string(), "0.0000001");
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Amount::from_units(2)).unwrap();
        assert_eq!(json, "\"2.0000000\"");
        let back: Amount = serde_json::from_str("\"2.5\"").unwrap();
        assert_eq!(back, Amount::from_stroops(25_000_000));
    }
}
