//! Money amounts using decimal arithmetic.
//!
//! Quote totals are computed from line items as Σ(quantity × price) and
//! stored rounded to two decimal places.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency codes a quote can be issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Mexican peso, the default for new quotes.
    #[default]
    MXN,
    /// US dollar.
    USD,
}

impl CurrencyCode {
    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MXN => "MXN",
            Self::USD => "USD",
        }
    }

    /// Currency symbol used when rendering amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::MXN | Self::USD => "$",
        }
    }

    /// The other supported currency (the quote form toggles between the two).
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::MXN => Self::USD,
            Self::USD => Self::MXN,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MXN" => Ok(Self::MXN),
            "USD" => Ok(Self::USD),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

/// An amount with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (pesos, not centavos).
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }
}

impl fmt::Display for Money {
    /// Renders as `MXN $1234.50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{:.2}",
            self.currency.code(),
            self.currency.symbol(),
            round_cents(self.amount)
        )
    }
}

/// Round to two decimal places, midpoints away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a numeric form input.
///
/// Accepts `,` as decimal separator. Blank or unparsable input yields zero,
/// matching how the quote form treats what the user typed.
#[must_use]
pub fn parse_amount(input: &str) -> Decimal {
    let normalized = input.trim().replace(',', ".");
    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_accepts_comma() {
        assert_eq!(parse_amount("1,5"), Decimal::new(15, 1));
        assert_eq!(parse_amount(" 250.75 "), Decimal::new(25075, 2));
    }

    #[test]
    fn test_parse_amount_garbage_is_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("1.2.3"), Decimal::ZERO);
    }

    #[test]
    fn test_round_cents_midpoint() {
        assert_eq!(round_cents(Decimal::new(10005, 3)), Decimal::new(1001, 2));
        assert_eq!(round_cents(Decimal::new(-10005, 3)), Decimal::new(-1001, 2));
    }

    #[test]
    fn test_money_display() {
        let money = Money::new(Decimal::new(1234, 1), CurrencyCode::MXN);
        assert_eq!(money.to_string(), "MXN $123.40");
    }

    #[test]
    fn test_currency_parse_and_toggle() {
        assert_eq!("usd".parse::<CurrencyCode>(), Ok(CurrencyCode::USD));
        assert!("EUR".parse::<CurrencyCode>().is_err());
        assert_eq!(CurrencyCode::MXN.toggled(), CurrencyCode::USD);
        assert_eq!(CurrencyCode::default(), CurrencyCode::MXN);
    }
}
