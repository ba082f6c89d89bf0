//! Money type for representing monetary values.
//!
//! Amounts are integer minor units (piastres for EGP, cents for USD).
//! Catalog prices arrive as JSON numbers and are rounded to minor units
//! exactly once, when they enter the cart; every later step is checked
//! integer arithmetic.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    EGP,
    USD,
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "EGP").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EGP => "EGP",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Minor units in one major unit.
    pub fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "EGP" => Some(Currency::EGP),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a Money value from whole major units (e.g., 120 EGP).
    ///
    /// Returns `None` on overflow.
    pub fn from_major(amount: i64, currency: Currency) -> Option<Self> {
        amount
            .checked_mul(currency.minor_per_major())
            .map(|minor| Self::new(minor, currency))
    }

    /// Create a Money value from a decimal amount, rounding half away
    /// from zero to the nearest minor unit.
    ///
    /// ```
    /// use storefront_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(49.99, Currency::EGP).unwrap();
    /// assert_eq!(price.amount_minor, 4999);
    /// ```
    ///
    /// Returns `None` for NaN, infinities and values outside `i64` range.
    pub fn from_decimal(amount: f64, currency: Currency) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let scaled = (amount * currency.minor_per_major() as f64).round();
        if scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
            return None;
        }
        Some(Self::new(scaled as i64, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// True when the amount has no fractional minor units.
    pub fn is_whole(&self) -> bool {
        self.amount_minor % self.currency.minor_per_major() == 0
    }

    /// Convert to a decimal value in major units.
    pub fn to_decimal(&self) -> f64 {
        self.amount_minor as f64 / self.currency.minor_per_major() as f64
    }

    /// Amount without the currency code: `"300"` or `"12.50"`.
    pub fn display_amount(&self) -> String {
        let per_major = self.currency.minor_per_major();
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        let major = abs / per_major as u64;
        let minor = abs % per_major as u64;
        if minor == 0 {
            format!("{sign}{major}")
        } else {
            let places = self.currency.decimal_places() as usize;
            format!("{sign}{major}.{minor:0places$}")
        }
    }

    /// Format for display, e.g. `"300 EGP"`.
    pub fn display(&self) -> String {
        format!("{} {}", self.display_amount(), self.currency.code())
    }

    /// Try to add another Money value.
    ///
    /// Returns `None` if currencies differ or the sum overflows.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a quantity, `None` on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_minor
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Serialize a [`Money`] as a bare JSON number in major units.
///
/// Whole amounts go out as integers (`420`), the rest as floats
/// (`12.5`). This is the shape the order service stores.
pub fn serialize_major<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
    if money.is_whole() {
        serializer.serialize_i64(money.amount_minor / money.currency.minor_per_major())
    } else {
        serializer.serialize_f64(money.to_decimal())
    }
}
