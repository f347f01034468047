//! Fixed-point rates used for payouts and win statistics.
//!
//! Uses `rust_decimal` so that `stake × rate` is floored exactly, without
//! binary floating-point drift.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing a return rate.
#[derive(Error, Debug)]
pub enum RateError {
    #[error("not a number: {0}")]
    Parse(#[from] rust_decimal::Error),

    #[error("return rate must not be negative, got {0}")]
    Negative(Decimal),
}

/// Non-negative payout multiplier for one side of a match.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use betting_ledger::ReturnRate;
///
/// let rate = ReturnRate::from_str("3.9").unwrap();
/// assert_eq!(rate.payout(10), Some(39));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ReturnRate(Decimal);

impl ReturnRate {
    /// Wraps a decimal, rejecting negative values.
    pub fn new(value: Decimal) -> Result<Self, RateError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(RateError::Negative(value));
        }
        Ok(ReturnRate(value))
    }

    /// Coins paid for a winning stake: `floor(stake × rate)`.
    ///
    /// Returns `None` if the product does not fit in an `i64`.
    pub fn payout(&self, stake: u32) -> Option<i64> {
        Decimal::from(stake)
            .checked_mul(self.0)?
            .floor()
            .to_i64()
    }
}

impl FromStr for ReturnRate {
    type Err = RateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        ReturnRate::new(decimal)
    }
}

impl fmt::Display for ReturnRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Share of legal bets a player won, kept at two decimal places.
///
/// Displays with a comma as decimal separator (`0,67`), matching the
/// result file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct WinRate(Decimal);

impl WinRate {
    /// Number of decimal places kept.
    pub const SCALE: u32 = 2;

    /// Computes `won / placed`, rounded half-up. Zero when nothing was placed.
    pub fn from_counts(won: usize, placed: usize) -> Self {
        if placed == 0 {
            return WinRate(Decimal::ZERO);
        }

        let ratio = Decimal::from(won) / Decimal::from(placed);
        WinRate(ratio.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl fmt::Display for WinRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = format!("{:.2}", self.0);
        f.write_str(&formatted.replace('.', ","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(s: &str) -> ReturnRate {
        ReturnRate::from_str(s).unwrap()
    }

    #[test]
    fn test_payout_floors_product() {
        assert_eq!(rate("3.9").payout(10), Some(39));
        assert_eq!(rate("1.45").payout(3), Some(4));
        assert_eq!(rate("0.75").payout(1), Some(0));
        assert_eq!(rate("5").payout(1), Some(5));
    }

    #[test]
    fn test_payout_zero_rate() {
        assert_eq!(rate("0").payout(1000), Some(0));
    }

    #[test]
    fn test_from_str_trims_whitespace() {
        assert_eq!(rate("  2.5  ").to_string(), "2.5");
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(matches!(
            ReturnRate::from_str("-1.5"),
            Err(RateError::Negative(_))
        ));
    }

    #[test]
    fn test_non_numeric_rate_rejected() {
        assert!(matches!(
            ReturnRate::from_str("abc"),
            Err(RateError::Parse(_))
        ));
    }

    #[test]
    fn test_win_rate_without_bets_is_zero() {
        assert_eq!(WinRate::from_counts(0, 0).to_string(), "0,00");
    }

    #[test]
    fn test_win_rate_rounds_half_up() {
        assert_eq!(WinRate::from_counts(2, 3).to_string(), "0,67");
        assert_eq!(WinRate::from_counts(1, 3).to_string(), "0,33");
        assert_eq!(WinRate::from_counts(1, 8).to_string(), "0,13");
        assert_eq!(WinRate::from_counts(1, 1).to_string(), "1,00");
        assert_eq!(WinRate::from_counts(1, 2).to_string(), "0,50");
    }
}
