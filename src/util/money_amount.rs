//! Human-readable currency amount parsing.
//!
//! This module provides [`MoneyAmount`], a type for parsing human-readable
//! currency strings into precise decimal values suitable for conversion to
//! integer minor units.
//!
//! # Supported Formats
//!
//! - Plain numbers: `"100"`, `"0.10"`
//! - With currency symbols: `"$10.50"`, `"€20"`
//! - With thousand separators: `"1,000"`, `"1,000,000.50"`
//!
//! Parsing is fixed-point throughout: the input never passes through binary
//! floating point, so amounts like `"0.10"` convert exactly.

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;

/// A parsed monetary amount with decimal precision.
///
/// Represents a positive decimal value parsed from a human-readable string.
/// [`minor_units`](MoneyAmount::minor_units) converts it to the currency's
/// smallest unit for two-fraction-digit currencies, rounding
/// half-away-from-zero — the sole rounding point in the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyAmount(Decimal);

/// Errors that can occur when parsing a monetary amount.
#[derive(Debug, thiserror::Error)]
pub enum MoneyAmountParseError {
    /// The input string could not be parsed as a number.
    #[error("Invalid number format")]
    InvalidFormat,
    /// The value is outside the allowed range.
    #[error(
        "Amount must be between {} and {}",
        constants::MIN_STR,
        constants::MAX_STR
    )]
    OutOfRange,
    /// Negative values are not allowed.
    #[error("Negative value is not allowed")]
    Negative,
}

mod constants {
    use super::*;
    use std::sync::LazyLock;

    pub const MIN_STR: &str = "0.01";
    pub const MAX_STR: &str = "999999999";

    pub static MIN: LazyLock<Decimal> =
        LazyLock::new(|| Decimal::from_str(MIN_STR).expect("valid decimal"));
    pub static MAX: LazyLock<Decimal> =
        LazyLock::new(|| Decimal::from_str(MAX_STR).expect("valid decimal"));
}

impl MoneyAmount {
    /// Parses a human-readable currency string into a [`MoneyAmount`].
    ///
    /// Currency symbols, thousand separators, and whitespace are stripped
    /// before parsing. The result must be a positive number within the
    /// allowed range.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The string cannot be parsed as a number
    /// - The value is negative
    /// - The value is outside the allowed range (zero included)
    pub fn parse(input: &str) -> Result<Self, MoneyAmountParseError> {
        // Remove anything that isn't digit, dot, minus
        let cleaned = Regex::new(r"[^\d\.\-]+")
            .unwrap()
            .replace_all(input, "")
            .to_string();

        let parsed =
            Decimal::from_str(&cleaned).map_err(|_| MoneyAmountParseError::InvalidFormat)?;

        if parsed.is_sign_negative() {
            return Err(MoneyAmountParseError::Negative);
        }

        if parsed < *constants::MIN || parsed > *constants::MAX {
            return Err(MoneyAmountParseError::OutOfRange);
        }

        Ok(MoneyAmount(parsed))
    }

    /// Converts the amount to integer minor units for a two-fraction-digit
    /// currency: `"10.00"` becomes `1000`.
    ///
    /// Inputs with more than two fraction digits are rounded to two here,
    /// half-away-from-zero. This is the only place a textual amount becomes
    /// canonical minor units.
    pub fn minor_units(&self) -> Result<u64, MoneyAmountParseError> {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        (rounded * Decimal::ONE_HUNDRED)
            .normalize()
            .to_u64()
            .ok_or(MoneyAmountParseError::OutOfRange)
    }
}

impl FromStr for MoneyAmount {
    type Err = MoneyAmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoneyAmount::parse(s)
    }
}

impl TryFrom<&str> for MoneyAmount {
    type Error = MoneyAmountParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        MoneyAmount::from_str(value)
    }
}

impl Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_two_digit_amounts_exactly() {
        assert_eq!(MoneyAmount::parse("10.00").unwrap().minor_units().unwrap(), 1000);
        assert_eq!(MoneyAmount::parse("0.10").unwrap().minor_units().unwrap(), 10);
        assert_eq!(MoneyAmount::parse("0.01").unwrap().minor_units().unwrap(), 1);
        assert_eq!(MoneyAmount::parse("12.34").unwrap().minor_units().unwrap(), 1234);
    }

    #[test]
    fn parses_whole_numbers() {
        assert_eq!(MoneyAmount::parse("100").unwrap().minor_units().unwrap(), 10_000);
    }

    #[test]
    fn strips_symbols_and_separators() {
        assert_eq!(
            MoneyAmount::parse("$1,000.50").unwrap().minor_units().unwrap(),
            100_050
        );
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 1.005 is the classic binary-float failure case; fixed-point keeps it exact.
        assert_eq!(MoneyAmount::parse("1.005").unwrap().minor_units().unwrap(), 101);
        assert_eq!(MoneyAmount::parse("2.675").unwrap().minor_units().unwrap(), 268);
        assert_eq!(MoneyAmount::parse("1.004").unwrap().minor_units().unwrap(), 100);
    }

    #[test]
    fn rejects_negative() {
        assert!(matches!(
            MoneyAmount::parse("-5.00"),
            Err(MoneyAmountParseError::Negative)
        ));
    }

    #[test]
    fn rejects_zero_and_out_of_range() {
        assert!(matches!(
            MoneyAmount::parse("0"),
            Err(MoneyAmountParseError::OutOfRange)
        ));
        assert!(matches!(
            MoneyAmount::parse("0.001"),
            Err(MoneyAmountParseError::OutOfRange)
        ));
        assert!(matches!(
            MoneyAmount::parse("1000000000"),
            Err(MoneyAmountParseError::OutOfRange)
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            MoneyAmount::parse("ten dollars"),
            Err(MoneyAmountParseError::InvalidFormat)
        ));
        assert!(MoneyAmount::parse("").is_err());
    }
}
