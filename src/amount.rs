//! Exact decimal amounts for ledger line-items.
//!
//! Wraps `rust_decimal` without rescaling, so an amount keeps the precision it
//! was written with in the export (`10000.00` stays `10000.00` on output).

use rust_decimal::Decimal;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg};
use std::str::FromStr;

/// A signed line-item amount.
///
/// Negative amounts reduce the account they are posted to, positive amounts
/// increase it. Equality is exact: `1.0 == 1.00`, but nothing is rounded.
///
/// # Examples
///
/// ```
/// use qb2iif::Amount;
///
/// assert_eq!(Amount::parse_lenient("-12.50").to_string(), "-12.50");
/// assert!(Amount::parse_lenient("n/a").is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Parses a cell value, converting anything that is not a decimal literal
    /// (including the empty string) to zero.
    ///
    /// Surrounding whitespace is ignored. Scientific notation (`1.5e3`) is
    /// accepted as a decimal literal.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or(Self::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = if trimmed.contains(['e', 'E']) {
            Decimal::from_scientific(trimmed)?
        } else {
            Decimal::from_str_exact(trimmed)?
        };
        Ok(Amount(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2", Decimal::new(2, 0))]
    #[case("2.0", Decimal::new(20, 1))]
    #[case("-209988.90", Decimal::new(-20998890, 2))]
    #[case("  157.04 ", Decimal::new(15704, 2))]
    #[case("+75", Decimal::new(75, 0))]
    #[case("1.5e3", Decimal::new(1500, 0))]
    fn test_parse_lenient_accepts_decimal_literals(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(Amount::parse_lenient(input), Amount::new(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("abc")]
    #[case("$12.00")]
    #[case("12.3.4")]
    #[case("1,234.00")]
    fn test_parse_lenient_falls_back_to_zero(#[case] input: &str) {
        assert!(Amount::parse_lenient(input).is_zero());
    }

    #[test]
    fn test_display_keeps_written_scale() {
        assert_eq!(Amount::parse_lenient("10000.00").to_string(), "10000.00");
        assert_eq!((-Amount::parse_lenient("10000.00")).to_string(), "-10000.00");
        assert_eq!(Amount::parse_lenient("75").to_string(), "75");
    }

    #[test]
    fn test_equality_ignores_scale() {
        assert_eq!(Amount::parse_lenient("55000"), Amount::parse_lenient("55000.00"));
    }

    #[test]
    fn test_sign_predicates() {
        assert!(Amount::parse_lenient("0.01").is_positive());
        assert!(Amount::parse_lenient("-0.01").is_negative());
        assert!(!Amount::ZERO.is_positive());
        assert!(!Amount::ZERO.is_negative());
    }

    #[test]
    fn test_sum_is_exact() {
        let legs = [
            Amount::parse_lenient("0.01"),
            Amount::parse_lenient("209988.89"),
        ];
        let total: Amount = legs.iter().sum();
        assert_eq!(total, Amount::parse_lenient("209988.90"));
    }
}
