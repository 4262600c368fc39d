//! Exact currency amounts backed by rust_decimal.
//!
//! Rates are compared against cent-precision thresholds, so every amount is
//! kept as a decimal and only rounded where the negotiation rules say so.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency amount (USD) with exact decimal arithmetic.
///
/// Serializes to a JSON number.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Build an amount from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Parse an amount from its textual form (`"2450.00"`, `"2280"`).
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn parse(s: &str) -> Result<Self, rust_decimal::Error> {
        Decimal::from_str(s.trim()).map(Money)
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn inner(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Round half-up (away from zero at the midpoint) to whole cents.
    pub fn round_cents(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiply by a unitless factor such as a markup of `1.02`.
    pub fn scale(&self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }

    /// Midpoint of two amounts, unrounded.
    pub fn midpoint(a: Money, b: Money) -> Self {
        Money((a.0 + b.0) / Decimal::TWO)
    }

    /// Storage form: always two decimal places, no exponent.
    pub fn to_storage_string(&self) -> String {
        format!("{:.2}", self.round_cents().0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_storage_string())
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}
