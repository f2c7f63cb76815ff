//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are single-currency; the catalog reports them in the store's
//! standard unit (dollars, not cents).

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit price.
///
/// Deserializes from either a JSON number (`139.9`) or a string (`"139.9"`),
/// and serializes as a string so no precision is lost on round trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Price of `quantity` units, saturating at the largest representable amount.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl core::ops::Add for Price {
    type Output = Self;

    /// Saturates instead of overflowing.
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| acc + p)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Price::from_cents(13990).to_string(), "$139.90");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        let from_number: Price = serde_json::from_str("139.9").unwrap();
        let from_string: Price = serde_json::from_str("\"139.9\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number, Price::from_cents(13990));
    }

    #[test]
    fn test_times_and_sum() {
        let unit = Price::from_cents(1999);
        assert_eq!(unit.times(3), Price::from_cents(5997));

        let total: Price = [Price::from_cents(100), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(350));
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_panicking() {
        let huge: Price = serde_json::from_str("\"50000000000000000000000000000\"").unwrap();
        let max = Price(Decimal::MAX);

        assert_eq!(huge.times(2), max);
        assert_eq!(huge + huge, max);
        assert_eq!([huge, huge, Price::from_cents(100)].into_iter().sum::<Price>(), max);
        assert!(max.to_string().starts_with("$79228162514264337593543950335"));
    }
}
