//! Type-safe price representation using decimal arithmetic.
//!
//! Prices never touch floating point: amounts are [`Decimal`] values in the
//! currency's standard unit (dollars, not cents), paired with an ISO 4217
//! currency code. Arithmetic helpers saturate instead of overflowing so that
//! derived values (line totals, tax) can never panic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// The display symbol (e.g. `$` for USD).
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// The three-letter currency code (e.g. `"USD"`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A price with currency information.
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use stylesphere_core::{CurrencyCode, Price};
///
/// let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD);
/// assert_eq!(price.display(), "$19.99");
/// assert_eq!(Price::from_cents(1999, CurrencyCode::USD), price);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    amount: Decimal,
    /// ISO 4217 currency code.
    currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from an amount in the smallest currency unit.
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(cents, 2),
            currency_code,
        }
    }

    /// The zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// The amount in the currency's standard unit.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency this amount is denominated in.
    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// This price multiplied by a unit count, e.g. a cart line total.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount.saturating_mul(Decimal::from(quantity)),
            currency_code: self.currency_code,
        }
    }

    /// This price scaled by a fractional rate, e.g. a sales tax rate.
    #[must_use]
    pub fn scaled(&self, rate: Decimal) -> Self {
        Self {
            amount: self.amount.saturating_mul(rate),
            currency_code: self.currency_code,
        }
    }

    /// The sum of two prices.
    ///
    /// Both operands are expected to share a currency; the left operand's
    /// currency is kept.
    #[must_use]
    pub fn plus(&self, other: Self) -> Self {
        Self {
            amount: self.amount.saturating_add(other.amount),
            currency_code: self.currency_code,
        }
    }

    /// Format for display (e.g., "$19.99").
    ///
    /// Rounds to cents; derived amounts like tax can carry more precision
    /// internally.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount.round_dp(2))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency_code.symbol(), self.amount.round_dp(2))
    }
}
