//! Amount type for monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! come from the backend as JSON numbers, or from the user as plain, currency-prefixed or
//! Brazilian-formatted strings.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

/// The currency symbol used when displaying amounts.
const CURRENCY: &str = "R$";

/// Represents a money value.
///
/// Transactions store a non-negative magnitude and carry their sign in their type, but `Amount`
/// itself is signed so that balances can be expressed with it.
///
/// # Examples
///
/// ```
/// # use finboard::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("R$ 1.234,50").unwrap();
/// assert_eq!(amount, Amount::from_str("1234.50").unwrap());
/// assert_eq!(amount.to_string(), "R$ 1.234,50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// The absolute value.
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Accepts `1234.56`, `R$ 1234.56`, `-R$ 12,50`, `1.234,56` and `1,234.56`. The last of `,`
    /// and `.` is taken as the decimal separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let unsigned = unsigned
            .strip_prefix(CURRENCY)
            .unwrap_or(unsigned)
            .trim_start();

        // Whichever of ',' and '.' comes last is the decimal separator; the other groups thousands.
        let normalized = match (unsigned.rfind(','), unsigned.rfind('.')) {
            (Some(comma), Some(dot)) if dot > comma => unsigned.replace(',', ""),
            (Some(_), _) => unsigned.replace('.', "").replace(',', "."),
            (None, _) => unsigned.to_string(),
        };

        let value = Decimal::from_str(&normalized).map_err(AmountError)?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs().round_dp(2);
        // format_num renders "1,234.56"; the tracker's currency uses "1.234,56".
        let en = format_num::format_num!(",.2", num.to_f64().unwrap_or_default());
        let br: String = en
            .chars()
            .map(|c| match c {
                ',' => '.',
                '.' => ',',
                other => other,
            })
            .collect();
        write!(f, "{sign}{CURRENCY} {br}")
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Plain decimal string; the backend casts it into its numeric column.
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        match raw {
            serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .map(Amount)
                .map_err(serde::de::Error::custom),
            serde_json::Value::String(s) => Amount::from_str(&s).map_err(serde::de::Error::custom),
            serde_json::Value::Null => Ok(Amount::ZERO),
            other => Err(serde::de::Error::custom(format!(
                "expected a number or string for an amount, found {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), dec("50.00"));
    }

    #[test]
    fn test_parse_with_currency() {
        let amount = Amount::from_str("R$ 50,25").unwrap();
        assert_eq!(amount.value(), dec("50.25"));
    }

    #[test]
    fn test_parse_negative_with_currency() {
        let amount = Amount::from_str("-R$ 1.500,00").unwrap();
        assert_eq!(amount.value(), dec("-1500.00"));
    }

    #[test]
    fn test_parse_brazilian_thousands() {
        let amount = Amount::from_str("1.234.567,89").unwrap();
        assert_eq!(amount.value(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_english_thousands() {
        let amount = Amount::from_str("1,234.56").unwrap();
        assert_eq!(amount.value(), dec("1234.56"));
        let amount = Amount::from_str("R$ 1,234,567.8").unwrap();
        assert_eq!(amount.value(), dec("1234567.8"));
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("  ").unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("abc").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from(1234).to_string(), "R$ 1.234,00");
        assert_eq!(Amount::new(dec("-7.5")).to_string(), "-R$ 7,50");
        assert_eq!(Amount::ZERO.to_string(), "R$ 0,00");
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let a: Amount = serde_json::from_str("12.5").unwrap();
        assert_eq!(a.value(), dec("12.5"));
        let b: Amount = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(b.value(), dec("12.50"));
        let c: Amount = serde_json::from_str("100").unwrap();
        assert_eq!(c.value(), dec("100"));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&Amount::new(dec("40.10"))).unwrap();
        assert_eq!(json, "\"40.10\"");
    }

    #[test]
    fn test_arithmetic() {
        let total: Amount = vec![Amount::from(10), Amount::from(5)].into_iter().sum();
        assert_eq!(total, Amount::from(15));
        assert_eq!(total - Amount::from(20), Amount::from(-5));
        assert!((Amount::from(1) - Amount::from(2)).is_negative());
        assert_eq!((-Amount::from(3)).abs(), Amount::from(3));
    }
}
