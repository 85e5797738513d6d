//! Monetary amounts as carried on the wire and in persisted carts.
//!
//! Amounts stay decimal strings end to end (the catalog file, the persisted
//! cart, the JSON API) so nothing passes through a binary float. Arithmetic
//! happens on [`Decimal`] and is written back with `Decimal`'s own
//! formatting, which keeps the scale of its operands (`10.00 * 2` is
//! `"20.00"`, zero is `"0"`).

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217-style currency code in canonical (trimmed, uppercase) form.
///
/// Construction through [`CurrencyCode::new`] canonicalizes case only;
/// alias mapping (`"S/"` to `PEN` and so on) is the job of
/// [`CurrencyNormalizer`](super::CurrencyNormalizer). Deserialization is
/// transparent so stale or foreign records round-trip untouched until they
/// are normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Fallback currency when neither the input nor the catalog provides one.
    pub const FALLBACK: &'static str = "USD";

    /// Create a currency code, trimming and uppercasing the input.
    #[must_use]
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_uppercase())
    }

    /// The global fallback currency.
    #[must_use]
    pub fn fallback() -> Self {
        Self(Self::FALLBACK.to_owned())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the code carries no information.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// Currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: impl Into<String>, currency_code: CurrencyCode) -> Self {
        Self {
            amount: amount.into(),
            currency_code,
        }
    }

    /// A zero amount (`"0"`) in the given currency.
    #[must_use]
    pub fn zero(currency_code: CurrencyCode) -> Self {
        Self::from_decimal(Decimal::ZERO, currency_code)
    }

    /// Serialize a decimal value into a money amount.
    #[must_use]
    pub fn from_decimal(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount: amount.to_string(),
            currency_code,
        }
    }

    /// Parse the amount, or `None` if it is empty or not a decimal number.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        let amount = self.amount.trim();
        if amount.is_empty() {
            return None;
        }
        Decimal::from_str(amount).ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_canonicalizes_case() {
        assert_eq!(CurrencyCode::new(" pen ").as_str(), "PEN");
        assert!(CurrencyCode::new("   ").is_empty());
        assert_eq!(CurrencyCode::fallback().as_str(), "USD");
    }

    #[test]
    fn test_money_keeps_scale() {
        let unit = Money::new("10.00", CurrencyCode::fallback());
        let total = unit.to_decimal().unwrap() * Decimal::from(2);
        assert_eq!(Money::from_decimal(total, CurrencyCode::fallback()).amount, "20.00");
    }

    #[test]
    fn test_zero_is_plain() {
        assert_eq!(Money::zero(CurrencyCode::fallback()).amount, "0");
    }

    #[test]
    fn test_unparseable_amounts() {
        assert_eq!(Money::new("", CurrencyCode::fallback()).to_decimal(), None);
        assert_eq!(Money::new("ten", CurrencyCode::fallback()).to_decimal(), None);
        assert_eq!(
            Money::new(" 12.5 ", CurrencyCode::fallback()).to_decimal(),
            Some(Decimal::new(125, 1))
        );
    }

    #[test]
    fn test_money_json_shape() {
        let money = Money::new("19.90", CurrencyCode::new("PEN"));
        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(json, serde_json::json!({"amount": "19.90", "currencyCode": "PEN"}));
    }
}
