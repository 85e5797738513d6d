//! Filtering and ordering for product listings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vitrina_core::Product;

/// Sort keys for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSortKey {
    /// Catalog order.
    #[default]
    Relevance,
    /// Sort by title (case-insensitive).
    Title,
    /// Sort by lowest variant price.
    Price,
    /// Sort by vendor (case-insensitive).
    Vendor,
}

/// Listing filter, as accepted by `getProducts` and `getCollectionProducts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Case-insensitive substring matched against title, handle, vendor and tags.
    #[serde(default)]
    pub query: Option<String>,
    /// Ordering.
    #[serde(default)]
    pub sort_key: ProductSortKey,
    /// Reverse the final order.
    #[serde(default)]
    pub reverse: bool,
}

impl ProductFilter {
    /// Apply the filter to a listing, keeping catalog order among ties.
    #[must_use]
    pub fn apply<'a>(&self, products: impl IntoIterator<Item = &'a Product>) -> Vec<&'a Product> {
        let needle = self
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<&Product> = products
            .into_iter()
            .filter(|product| needle.as_deref().is_none_or(|q| matches_query(product, q)))
            .collect();

        match self.sort_key {
            ProductSortKey::Relevance => {}
            ProductSortKey::Title => matched.sort_by_cached_key(|p| p.title.to_lowercase()),
            ProductSortKey::Vendor => matched.sort_by_cached_key(|p| p.vendor.to_lowercase()),
            ProductSortKey::Price => matched.sort_by_key(|p| min_price(p)),
        }

        if self.reverse {
            matched.reverse();
        }
        matched
    }
}

fn matches_query(product: &Product, needle: &str) -> bool {
    product.title.to_lowercase().contains(needle)
        || product.handle.to_lowercase().contains(needle)
        || product.vendor.to_lowercase().contains(needle)
        || product
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

fn min_price(product: &Product) -> Decimal {
    product
        .price_range
        .min_variant_price
        .to_decimal()
        .unwrap_or_default()
}
