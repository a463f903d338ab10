use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// number of minor units kept on every amount (fils, cents)
pub const MINOR_UNITS: u32 = 2;

/// Money type for dues, fees and wallet balances, kept at 2 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(MINOR_UNITS))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s.trim())?.round_dp(MINOR_UNITS)))
    }

    /// create from integer amount (dirhams, dollars, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor amount (fils, cents, etc)
    pub fn from_minor(amount: i64) -> Self {
        Money(Decimal::new(amount, MINOR_UNITS))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// absolute value
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// the positive part, zero for anything else
    pub fn clamp_non_negative(self) -> Self {
        self.max(Money::ZERO)
    }

    /// multiply by a whole number of periods (e.g. months x monthly fee)
    pub fn times(&self, count: u64) -> Self {
        Money((self.0 * Decimal::from(count)).round_dp(MINOR_UNITS))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money((self.0 + other.0).round_dp(MINOR_UNITS))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = (self.0 + other.0).round_dp(MINOR_UNITS);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money((self.0 - other.0).round_dp(MINOR_UNITS))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = (self.0 - other.0).round_dp(MINOR_UNITS);
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        // subtract rather than flip the sign so zero never renders as -0
        Money(Decimal::ZERO - self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money((self.0 * other).round_dp(MINOR_UNITS))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("15.005").unwrap();
        assert_eq!(m.to_string(), "15.00"); // banker's rounding to 2 places

        let m = Money::from_str_exact(" 12.345 ").unwrap();
        assert_eq!(m.as_decimal(), dec!(12.34));
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Money::from_minor(1_500), Money::from_major(15));
        assert_eq!(Money::from_minor(-250).as_decimal(), dec!(-2.50));
    }

    #[test]
    fn test_sign_checks_exclude_zero() {
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::ZERO.is_negative());
        assert!(Money::from_major(-20).is_negative());
        assert_eq!(Money::from_major(-20).clamp_non_negative(), Money::ZERO);
        assert_eq!((-Money::from_major(20)).abs(), Money::from_major(20));
    }

    #[test]
    fn test_times_and_sum() {
        let fee = Money::from_major(15);
        assert_eq!(fee.times(6), Money::from_major(90));

        let total: Money = vec![fee, fee, Money::from_major(10)].into_iter().sum();
        assert_eq!(total, Money::from_major(40));
    }
}
