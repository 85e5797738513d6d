//! Currency label normalization.
//!
//! Catalog files are produced by hand or by import tooling and spell the
//! same currency several ways (`"S/"`, `"Soles"`, `"US$"`). Every amount the
//! store emits goes through [`CurrencyNormalizer::normalize`] first.

use super::price::CurrencyCode;

/// Labels that mean Peruvian sol.
const PEN_ALIASES: &[&str] = &["SOLES", "S/", "SOL", "SOLES PERUANOS"];

/// Labels that mean US dollar.
const USD_ALIASES: &[&str] = &["US$", "DOLARES", "USD$"];

/// Maps free-form currency labels to canonical codes.
///
/// Pure and total: every input yields a code. Empty or missing input resolves
/// to the normalizer's default currency, which for a loaded catalog is the
/// currency of its first variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyNormalizer {
    default: CurrencyCode,
}

impl Default for CurrencyNormalizer {
    fn default() -> Self {
        Self {
            default: CurrencyCode::fallback(),
        }
    }
}

impl CurrencyNormalizer {
    /// Create a normalizer with the given default currency.
    ///
    /// An empty default is replaced by the global fallback.
    #[must_use]
    pub fn new(default: CurrencyCode) -> Self {
        if default.is_empty() {
            return Self::default();
        }
        Self { default }
    }

    /// The currency used for empty or missing labels.
    #[must_use]
    pub const fn default_currency(&self) -> &CurrencyCode {
        &self.default
    }

    /// Canonicalize a currency label.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitrina_core::{CurrencyCode, CurrencyNormalizer};
    ///
    /// let normalizer = CurrencyNormalizer::new(CurrencyCode::new("PEN"));
    /// assert_eq!(normalizer.normalize(Some("soles")).as_str(), "PEN");
    /// assert_eq!(normalizer.normalize(Some("US$")).as_str(), "USD");
    /// assert_eq!(normalizer.normalize(Some("eur")).as_str(), "EUR");
    /// assert_eq!(normalizer.normalize(None).as_str(), "PEN");
    /// ```
    #[must_use]
    pub fn normalize(&self, code: Option<&str>) -> CurrencyCode {
        let upper = code.unwrap_or_default().trim().to_uppercase();
        if upper.is_empty() {
            return self.default.clone();
        }
        if PEN_ALIASES.contains(&upper.as_str()) {
            return CurrencyCode::new("PEN");
        }
        if USD_ALIASES.contains(&upper.as_str()) {
            return CurrencyCode::new("USD");
        }
        CurrencyCode::new(&upper)
    }

    /// Canonicalize an already-typed code (e.g. one read back from storage).
    #[must_use]
    pub fn normalize_code(&self, code: &CurrencyCode) -> CurrencyCode {
        self.normalize(Some(code.as_str()))
    }
}
