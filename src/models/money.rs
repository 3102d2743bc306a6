//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Prices, costs, fees and labor rates all use it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A monetary amount stored as cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from dollars and cents
    pub const fn from_dollars_cents(dollars: i64, cents: i64) -> Self {
        Self(dollars * 100 + cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole dollars portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Cost of `seconds` of labor at this hourly rate, rounded to the nearest cent
    pub fn for_seconds_at_hourly(&self, seconds: i64) -> Money {
        let numerator = self.0 as i128 * seconds as i128;
        let rounded = (numerator + numerator.signum() * 1800) / 3600;
        Money(i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };

        let s = s.strip_prefix('$').unwrap_or(s);
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let digits = |part: &str| -> Result<i64, MoneyParseError> {
            if part.is_empty() {
                return Ok(0);
            }
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        let (dollars, fraction_cents) = match s.split_once('.') {
            Some((dollars, fraction)) => {
                if !fraction.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                // Digits past the cent are truncated
                let fraction_cents = match fraction.get(..2) {
                    Some(two) => digits(two)?,
                    None => digits(fraction)? * 10,
                };
                (digits(dollars)?, fraction_cents)
            }
            None if s.is_empty() => return Err(invalid()),
            None => (digits(s)?, 0),
        };

        let cents = dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Plain decimal formatting without a symbol (e.g. "1234.50")
    pub fn to_plain_string(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.dollars().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.dollars(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Extended cost of a quantity at a unit price
impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, qty: u32) -> Self {
        Self(self.0.saturating_mul(qty as i64))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(250).to_string(), "$2.50");
        assert_eq!(Money::from_cents(-1050).to_string(), "-$10.50");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("2.50").unwrap().cents(), 250);
        assert_eq!(Money::parse("$2.5").unwrap().cents(), 250);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("12").unwrap().cents(), 1200);
        assert_eq!(Money::parse(".99").unwrap().cents(), 99);
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("").is_err());
        assert!(Money::parse("1.5€").is_err());
        assert!(Money::parse("€.50").is_err());
        assert!(Money::parse("+5").is_err());
        assert!(Money::parse("99999999999999999").is_err());
        assert!(Money::parse("99999999999999999.00").is_err());
        assert_eq!(Money::parse("1.999").unwrap().cents(), 199);
    }

    #[test]
    fn test_quantity_multiplication() {
        assert_eq!((Money::from_cents(250) * 3).cents(), 750);
        assert_eq!((Money::from_cents(250) * 0).cents(), 0);
        assert_eq!((Money::from_cents(i64::MAX) * 2).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN / 2) * 3).cents(), i64::MIN);
    }

    #[test]
    fn test_labor_cost_rounds_to_cent() {
        let rate = Money::from_dollars_cents(12, 0);
        assert_eq!(rate.for_seconds_at_hourly(3600).cents(), 1200);
        assert_eq!(rate.for_seconds_at_hourly(1800).cents(), 600);
        // 1 second at $12/h is 0.333 cents
        assert_eq!(rate.for_seconds_at_hourly(1).cents(), 0);
        assert_eq!(rate.for_seconds_at_hourly(2).cents(), 1);
    }

    #[test]
    fn test_labor_cost_saturates() {
        let rate = Money::from_cents(i64::MAX);
        assert_eq!(rate.for_seconds_at_hourly(7200).cents(), i64::MAX);
        assert_eq!((-rate).for_seconds_at_hourly(7200).cents(), i64::MIN);
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(Money::from_cents(123450).to_plain_string(), "1234.50");
        assert_eq!(Money::from_cents(-7).to_plain_string(), "-0.07");
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(1050)).unwrap();
        assert_eq!(json, "1050");
    }
}
