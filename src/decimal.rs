use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// number of decimal places carried by every currency amount
pub const CURRENCY_DP: u32 = 2;

/// round half-up (away from zero on a tie) to currency precision
fn to_cents(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Money type held at cent precision; every operation re-rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE_CENT: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// create from decimal, rounding half-up to cents
    pub fn from_decimal(d: Decimal) -> Self {
        Money(to_cents(d))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(to_cents(Decimal::from_str(s.trim())?)))
    }

    /// create from whole currency units
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from cents
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, CURRENCY_DP))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly below zero; `-0.00` does not count
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// true when the value carries no more than cent precision
    pub fn is_cent_exact(&self) -> bool {
        self.0 == to_cents(self.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // always render two places, e.g. 100 -> 100.00
        let mut d = self.0;
        d.rescale(CURRENCY_DP);
        write!(f, "{}", d)
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

impl From<Money> for Decimal {
    fn from(m: Money) -> Self {
        m.0
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
        Money(to_cents(self.0 + other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = to_cents(self.0 + other.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(to_cents(self.0 - other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = to_cents(self.0 - other.0);
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money(to_cents(self.0 * other))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, other: u32) -> Money {
        Money(to_cents(self.0 * Decimal::from(other)))
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money(to_cents(self.0 / other))
    }
}

/// annual interest rate, stored as a fraction (0.06 == 6% APR)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from fraction (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from an APR percentage (e.g., 17.75 for 17.75%)
    pub fn from_percent(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    /// get as fraction
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as APR percentage, normalized (6.0 -> 6)
    pub fn as_percentage(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).normalize()
    }

    /// monthly rate from annual rate, i.e. apr / 1200
    pub fn monthly_rate(&self) -> Decimal {
        self.0 / Decimal::from(12)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_rounds_half_up() {
        assert_eq!(Money::from_decimal(dec!(10.005)), Money::from_cents(1001));
        assert_eq!(Money::from_decimal(dec!(10.004)), Money::from_cents(1000));
        // banker's rounding would give 0.02 here
        assert_eq!(Money::from_decimal(dec!(0.025)), Money::from_cents(3));
        assert_eq!(Money::from_decimal(dec!(-0.025)), Money::from_cents(-3));
    }

    #[test]
    fn test_money_parsing() {
        let m = Money::from_str_exact(" 19999.999 ").unwrap();
        assert_eq!(m, Money::from_major(20_000));
        assert!(Money::from_str_exact("twenty").is_err());
    }

    #[test]
    fn test_money_display_has_two_places() {
        assert_eq!(Money::from_major(100).to_string(), "100.00");
        assert_eq!(Money::from_cents(54759).to_string(), "547.59");
        assert_eq!(Money::from_decimal(dec!(0.1)).to_string(), "0.10");
    }

    #[test]
    fn test_arithmetic_stays_cent_exact() {
        let payment = Money::from_cents(54759);
        let mut balance = payment * 36u32;
        assert_eq!(balance, Money::from_cents(1_971_324));

        for _ in 0..36 {
            balance -= payment;
            assert!(balance.is_cent_exact());
        }
        assert!(balance.is_zero());

        let third = Money::from_major(100) / dec!(3);
        assert_eq!(third, Money::from_cents(3333));
    }

    #[test]
    fn test_money_serializes_as_string() {
        let json = serde_json::to_string(&Money::from_cents(54759)).unwrap();
        assert_eq!(json, "\"547.59\"");

        let back: Money = serde_json::from_str("\"547.594\"").unwrap();
        assert_eq!(back, Money::from_cents(54759));
    }

    #[test]
    fn test_rate_conversions() {
        let rate = Rate::from_percent(dec!(6.0));
        assert_eq!(rate.as_decimal(), dec!(0.06));
        assert_eq!(rate.as_percentage(), dec!(6));
        assert_eq!(rate.monthly_rate(), dec!(0.005));
        assert_eq!(rate.to_string(), "6%");

        let odd = Rate::from_percent(dec!(17.75));
        assert_eq!(odd.as_percentage(), dec!(17.75));
    }
}
