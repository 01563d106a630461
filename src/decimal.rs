//! Fixed-point currency type with 2 decimal places.
//!
//! Uses `rust_decimal` internally with scale enforcement so that every balance
//! and transfer is a whole number of cents.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A currency value that maintains exactly 2 decimal places.
///
/// Any value with more precision is rounded half-to-even (banker's rounding)
/// when it enters the type, so a `Money` can always be compared and summed
/// exactly.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use settle_up::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Creates a new `Money` from a `Decimal`, rounding half-to-even to cents.
    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(Self::SCALE);
        // "-0.00" must print as "0.00"
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        Money(rounded)
    }

    /// Creates a value from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, Self::SCALE))
    }

    /// Returns the underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `true` if this value is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the magnitude of this value.
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Money::new(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = Money::new(self.0 + rhs.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::new(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        *self = Money::new(self.0 - rhs.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money::new(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::str::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        rust_decimal::serde::str::deserialize(deserializer).map(Money::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_normalizes_scale() {
        assert_eq!(Money::from_str("1").unwrap().to_string(), "1.00");
        assert_eq!(Money::from_str("1.5").unwrap().to_string(), "1.50");
        assert_eq!(Money::from_str("  2.25  ").unwrap().to_string(), "2.25");
    }

    #[test]
    fn test_rounds_half_to_even() {
        assert_eq!(Money::from_str("0.125").unwrap().to_string(), "0.12");
        assert_eq!(Money::from_str("0.135").unwrap().to_string(), "0.14");
        assert_eq!(Money::from_str("-0.125").unwrap().to_string(), "-0.12");
        assert_eq!(Money::from_str("3.3333").unwrap().to_string(), "3.33");
    }

    #[test]
    fn test_arithmetic_preserves_scale() {
        let a = Money::from_str("1.5").unwrap();
        let b = Money::from_str("2.5").unwrap();

        assert_eq!((a + b).to_string(), "4.00");
        assert_eq!((a - b).to_string(), "-1.00");

        let mut c = a;
        c += b;
        c -= Money::from_cents(1);
        assert_eq!(c.to_string(), "3.99");
    }

    #[test]
    fn test_sign_helpers() {
        let positive = Money::from_cents(100);
        let negative = -positive;

        assert!(positive.is_positive());
        assert!(negative.is_negative());
        assert_eq!(negative.abs(), positive);
        assert!(Money::ZERO.is_zero());
        assert!(!Money::ZERO.is_positive() && !Money::ZERO.is_negative());
    }

    #[test]
    fn test_zero_never_prints_negative() {
        assert_eq!((-Money::ZERO).to_string(), "0.00");

        let mut m = Money::from_cents(-5);
        m += Money::from_cents(5);
        assert_eq!(m.to_string(), "0.00");

        let mut m = -Money::ZERO;
        m -= Money::ZERO;
        assert_eq!(m.to_string(), "0.00");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Money::from_cents(-1050)).unwrap();
        assert_eq!(json, r#""-10.50""#);

        let parsed: Money = serde_json::from_str(r#""3.335""#).unwrap();
        assert_eq!(parsed, Money::from_cents(334));
        assert_eq!(parsed.to_string(), "3.34");

        let parsed: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Money::from_cents(-1050));
    }

    #[test]
    fn test_sum() {
        let total: Money = ["1.10", "2.20", "-0.30"]
            .iter()
            .map(|s| Money::from_str(s).unwrap())
            .sum();
        assert_eq!(total, Money::from_cents(300));
    }
}
