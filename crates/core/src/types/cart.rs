//! Cart shapes, as persisted under `cart:<id>` and returned by the store.
//!
//! Derived fields (`cost`, line costs, `total_quantity`) are only trusted
//! after the storefront's totals engine has recomputed them; a cart read back
//! from storage may carry stale values.

use serde::{Deserialize, Serialize};

use super::catalog::{Product, ProductVariant, SelectedOption};
use super::id::{CartId, LineId, VariantId};
use super::price::{CurrencyCode, Money};

/// Checkout location used when a cart does not carry a usable one.
pub const DEFAULT_CHECKOUT_URL: &str = "/checkout";

/// Merchandise in a cart line: a snapshot of the variant taken when the line
/// was added or last updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMerchandise {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title.
    pub title: String,
    /// Selected options.
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    /// Parent product snapshot.
    pub product: Product,
    /// Unit price snapshot. Absent on records written before prices were
    /// embedded; those are re-resolved against the catalog.
    #[serde(default)]
    pub price: Option<Money>,
}

impl CartMerchandise {
    /// Snapshot a variant and its parent product.
    #[must_use]
    pub fn snapshot(variant: &ProductVariant, product: &Product) -> Self {
        Self {
            id: variant.id.clone(),
            title: variant.title.clone(),
            selected_options: variant.selected_options.clone(),
            product: product.clone(),
            price: Some(variant.price.clone()),
        }
    }
}

/// Cost for a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCost {
    /// Unit price times quantity.
    pub total_amount: Money,
}

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart line ID.
    pub id: LineId,
    /// Quantity (positive in every cart the store hands out).
    pub quantity: u32,
    /// Line cost.
    pub cost: CartLineCost,
    /// Product variant snapshot.
    pub merchandise: CartMerchandise,
}

impl CartLine {
    /// Start a new line for a variant. The cost is filled in on recompute.
    #[must_use]
    pub fn new(variant: &ProductVariant, product: &Product, quantity: u32) -> Self {
        Self {
            id: LineId::for_variant(&variant.id),
            quantity,
            cost: CartLineCost {
                total_amount: Money::zero(variant.price.currency_code.clone()),
            },
            merchandise: CartMerchandise::snapshot(variant, product),
        }
    }
}

/// Cart cost summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    /// Sum of line totals.
    pub subtotal_amount: Money,
    /// Subtotal plus tax.
    pub total_amount: Money,
    /// Total tax amount.
    pub total_tax_amount: Money,
}

impl CartCost {
    /// All-zero cost in one currency.
    #[must_use]
    pub fn zero(currency_code: &CurrencyCode) -> Self {
        Self {
            subtotal_amount: Money::zero(currency_code.clone()),
            total_amount: Money::zero(currency_code.clone()),
            total_tax_amount: Money::zero(currency_code.clone()),
        }
    }
}

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Checkout URL.
    pub checkout_url: String,
    /// Cart cost summary.
    pub cost: CartCost,
    /// Cart lines, at most one per variant.
    pub lines: Vec<CartLine>,
    /// Total item quantity.
    pub total_quantity: u64,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn empty(id: CartId, currency_code: &CurrencyCode, checkout_url: &str) -> Self {
        Self {
            id,
            checkout_url: checkout_url.to_owned(),
            cost: CartCost::zero(currency_code),
            lines: Vec::new(),
            total_quantity: 0,
        }
    }

    /// Find the line holding a variant.
    #[must_use]
    pub fn line_for_variant_mut(&mut self, variant_id: &VariantId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.merchandise.id == *variant_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Input for adding a line to cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Product variant ID.
    pub merchandise_id: String,
    /// Quantity to add.
    pub quantity: u32,
}

/// Input for updating a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    /// Cart line ID.
    pub id: String,
    /// Merchandise the line should hold.
    pub merchandise_id: String,
    /// New quantity; zero removes the line.
    pub quantity: u32,
}
