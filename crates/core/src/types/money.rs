//! Type-safe money representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// An amount of money with currency information.
///
/// Amounts are held as [`Decimal`] in the currency's standard unit
/// (e.g., rand, not cents) and never pass through binary floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Create a rand-denominated amount.
    #[must_use]
    pub const fn zar(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::ZAR)
    }

    /// Create an amount from minor currency units (cents).
    #[must_use]
    pub fn from_minor_units(cents: i64, currency: CurrencyCode) -> Self {
        Self::new(Decimal::new(cents, 2), currency)
    }

    /// The amount in minor currency units (cents), rounded half-up.
    ///
    /// Payment gateways take amounts in minor units.
    #[must_use]
    pub fn minor_units(&self) -> i64 {
        (self.amount * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .unwrap_or(i64::MAX)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    ZAR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::ZAR => "R",
            Self::USD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ZAR => "ZAR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let price = Money::zar(Decimal::new(129950, 2));
        assert_eq!(price.to_string(), "R1299.50");
    }

    #[test]
    fn test_minor_units() {
        let price = Money::zar(Decimal::new(13500, 2));
        assert_eq!(price.minor_units(), 13500);
    }

    #[test]
    fn test_minor_units_rounds() {
        // Tax math can produce sub-cent amounts; the gateway gets whole cents.
        let price = Money::zar(Decimal::new(104999, 3)); // 104.999
        assert_eq!(price.minor_units(), 10500);
    }

    #[test]
    fn test_from_minor_units_roundtrip() {
        let price = Money::from_minor_units(4500, CurrencyCode::ZAR);
        assert_eq!(price.amount, Decimal::new(45, 0));
        assert_eq!(price.minor_units(), 4500);
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(CurrencyCode::ZAR.symbol(), "R");
        assert_eq!(CurrencyCode::ZAR.code(), "ZAR");
    }
}
