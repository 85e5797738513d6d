//! Merchandise resolution.

use vitrina_core::{Product, ProductVariant};

use super::CatalogStore;

/// A variant together with its parent product.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedVariant<'a> {
    pub variant: &'a ProductVariant,
    pub product: &'a Product,
}

/// Resolves a merchandise (variant) ID to the current catalog entry.
///
/// An unknown ID is `None`, not an error: callers decide whether that is a
/// skipped cart entry or a zero-priced line.
pub trait VariantResolver {
    /// Resolve a merchandise ID.
    fn resolve(&self, merchandise_id: &str) -> Option<ResolvedVariant<'_>>;
}

impl VariantResolver for CatalogStore {
    fn resolve(&self, merchandise_id: &str) -> Option<ResolvedVariant<'_>> {
        self.lookup_variant(merchandise_id)
            .map(|(variant, product)| ResolvedVariant { variant, product })
    }
}
