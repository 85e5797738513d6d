//! Cart totals.
//!
//! Every derived field of a cart (line costs, subtotal, tax, total, total
//! quantity) is recomputed from the lines alone. Whatever a stored cart says
//! about its totals is ignored, so recomputation is idempotent.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use vitrina_core::{Cart, CartCost, CartLine, CartLineCost, CurrencyCode, Money};

use crate::catalog::{CatalogStore, VariantResolver};

/// Tax seam. The store ships with [`ZeroTax`] only.
pub trait TaxPolicy: Send + Sync + fmt::Debug {
    /// Tax owed on a subtotal.
    fn tax_for(&self, subtotal: Decimal, currency_code: &CurrencyCode) -> Decimal;
}

/// No tax.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroTax;

impl TaxPolicy for ZeroTax {
    fn tax_for(&self, _subtotal: Decimal, _currency_code: &CurrencyCode) -> Decimal {
        Decimal::ZERO
    }
}

/// Recomputes cart totals against the catalog.
#[derive(Debug, Clone)]
pub struct TotalsEngine {
    catalog: Arc<CatalogStore>,
    tax: Arc<dyn TaxPolicy>,
}

impl TotalsEngine {
    /// Engine with no tax.
    #[must_use]
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        Self::with_tax_policy(catalog, Arc::new(ZeroTax))
    }

    /// Engine with a custom tax policy.
    #[must_use]
    pub fn with_tax_policy(catalog: Arc<CatalogStore>, tax: Arc<dyn TaxPolicy>) -> Self {
        Self { catalog, tax }
    }

    /// The catalog prices are resolved against.
    #[must_use]
    pub const fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    /// Recompute every derived field of `cart`.
    ///
    /// - The cart currency is the normalized currency of the current total
    /// - A line's unit price is its snapshot price when present and parseable;
    ///   otherwise the catalog's current price, which also refreshes the
    ///   snapshot; otherwise zero
    /// - Lines with quantity zero are dropped
    #[must_use]
    pub fn recompute(&self, mut cart: Cart) -> Cart {
        let currency = self
            .catalog
            .normalizer()
            .normalize_code(&cart.cost.total_amount.currency_code);

        cart.lines.retain(|line| line.quantity > 0);

        let mut subtotal = Decimal::ZERO;
        let mut total_quantity: u64 = 0;
        for line in &mut cart.lines {
            let line_total = self
                .unit_price(line)
                .saturating_mul(Decimal::from(line.quantity));
            line.cost = CartLineCost {
                total_amount: Money::from_decimal(line_total, currency.clone()),
            };
            subtotal = subtotal.saturating_add(line_total);
            total_quantity = total_quantity.saturating_add(u64::from(line.quantity));
        }

        let tax = self.tax.tax_for(subtotal, &currency);
        cart.cost = CartCost {
            subtotal_amount: Money::from_decimal(subtotal, currency.clone()),
            total_amount: Money::from_decimal(subtotal.saturating_add(tax), currency.clone()),
            total_tax_amount: Money::from_decimal(tax, currency),
        };
        cart.total_quantity = total_quantity;
        cart
    }

    fn unit_price(&self, line: &mut CartLine) -> Decimal {
        if let Some(price) = line.merchandise.price.as_ref().and_then(Money::to_decimal) {
            return price;
        }

        match self.catalog.resolve(line.merchandise.id.as_str()) {
            Some(resolved) => {
                line.merchandise.price = Some(resolved.variant.price.clone());
                resolved.variant.price.to_decimal().unwrap_or_default()
            }
            None => {
                tracing::debug!(
                    line = %line.id,
                    merchandise = %line.merchandise.id,
                    "Line has no usable price; counting it as zero"
                );
                Decimal::ZERO
            }
        }
    }
}
