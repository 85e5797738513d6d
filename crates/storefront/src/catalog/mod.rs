//! Static product catalog.
//!
//! # Architecture
//!
//! - The catalog file is a JSON array of product records, produced by the
//!   catalog tooling (`vitrina catalog add`) or by hand
//! - It is read once at start-up into an immutable [`CatalogStore`]; a new
//!   file is picked up on the next process start, never hot-reloaded
//! - Lookups go through two indices, by product handle and by variant ID
//!
//! A catalog that cannot be read is fatal: the store cannot price a cart
//! without it, so [`CatalogStore::load`] errors are meant to stop start-up.

mod query;
mod record;
mod resolver;

pub use query::{ProductFilter, ProductSortKey};
pub use record::{AmountRecord, ImageRecord, PriceRecord, ProductRecord, VariantRecord};
pub use resolver::{ResolvedVariant, VariantResolver};

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;
use vitrina_core::{
    Collection, CurrencyCode, CurrencyNormalizer, Money, Product, ProductVariant, VariantId,
    VendorCount,
};

/// Errors that make a catalog unusable.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not a JSON array of product records.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A product record has no variants.
    #[error("product {0:?} has no variants")]
    EmptyVariants(String),

    /// Two products share a handle.
    #[error("duplicate product handle {0:?}")]
    DuplicateHandle(String),

    /// Two variants share an ID.
    #[error("duplicate variant id {0:?}")]
    DuplicateVariant(String),
}

/// Read-only, indexed view of the static catalog.
#[derive(Debug)]
pub struct CatalogStore {
    products: Vec<Product>,
    by_handle: HashMap<String, usize>,
    /// Variant ID to (product index, variant index).
    by_variant: HashMap<VariantId, (usize, usize)>,
    normalizer: CurrencyNormalizer,
}

impl CatalogStore {
    /// Load the catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file is missing or unreadable, is not a
    /// JSON array of product records, or violates catalog uniqueness rules.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json_str(&json)?;

        tracing::info!(
            products = store.products.len(),
            variants = store.by_variant.len(),
            currency = %store.default_currency(),
            "Catalog loaded"
        );
        Ok(store)
    }

    /// Build a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// See [`CatalogStore::load`].
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<ProductRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Build a catalog from already-parsed records.
    ///
    /// The default currency is the normalized currency of the first variant
    /// of the first record, or the global fallback for an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for records without variants and for duplicate
    /// handles or variant IDs.
    pub fn from_records(records: Vec<ProductRecord>) -> Result<Self, CatalogError> {
        let default_currency = CurrencyNormalizer::default().normalize(
            records
                .first()
                .and_then(ProductRecord::first_currency_label),
        );
        let normalizer = CurrencyNormalizer::new(default_currency);

        let mut products = Vec::with_capacity(records.len());
        let mut by_handle = HashMap::with_capacity(records.len());
        let mut by_variant = HashMap::new();

        for record in records {
            let product = record.into_product(&normalizer)?;
            let index = products.len();

            match by_handle.entry(product.handle.clone()) {
                Entry::Occupied(_) => return Err(CatalogError::DuplicateHandle(product.handle)),
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }

            for (variant_index, variant) in product.variants.iter().enumerate() {
                match by_variant.entry(variant.id.clone()) {
                    Entry::Occupied(_) => {
                        return Err(CatalogError::DuplicateVariant(variant.id.to_string()));
                    }
                    Entry::Vacant(slot) => {
                        slot.insert((index, variant_index));
                    }
                }
            }

            products.push(product);
        }

        Ok(Self {
            products,
            by_handle,
            by_variant,
            normalizer,
        })
    }

    /// Currency used for empty labels and for carts with no currency yet.
    #[must_use]
    pub const fn default_currency(&self) -> &CurrencyCode {
        self.normalizer.default_currency()
    }

    /// The normalizer configured with this catalog's default currency.
    #[must_use]
    pub const fn normalizer(&self) -> &CurrencyNormalizer {
        &self.normalizer
    }

    /// Look up a product by handle.
    #[must_use]
    pub fn lookup_by_handle(&self, handle: &str) -> Option<&Product> {
        self.by_handle
            .get(handle)
            .and_then(|index| self.products.get(*index))
    }

    /// Look up a variant and its parent product.
    #[must_use]
    pub fn lookup_variant(&self, variant_id: &str) -> Option<(&ProductVariant, &Product)> {
        let (product_index, variant_index) = self.by_variant.get(variant_id)?;
        let product = self.products.get(*product_index)?;
        let variant = product.variants.get(*variant_index)?;
        Some((variant, product))
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn list_all(&self) -> &[Product] {
        &self.products
    }

    /// Products in a collection, matched by slug of the collection title.
    #[must_use]
    pub fn list_by_collection_slug(&self, slug: &str) -> Vec<&Product> {
        let wanted = vitrina_core::slugify(slug);
        self.products
            .iter()
            .filter(|product| {
                product
                    .collections
                    .iter()
                    .any(|collection| collection.handle == wanted)
            })
            .collect()
    }

    /// Distinct collections, in the order they first appear.
    #[must_use]
    pub fn list_collections(&self) -> Vec<Collection> {
        let mut collections: Vec<Collection> = Vec::new();
        for collection in self.products.iter().flat_map(|p| &p.collections) {
            if collections.iter().any(|c| c.handle == collection.handle) {
                continue;
            }
            collections.push(Collection {
                handle: collection.handle.clone(),
                title: collection.title.clone(),
                path: format!("/products/{}", collection.handle),
            });
        }
        collections
    }

    /// Vendors with their product counts, in the order they first appear.
    /// Products without a vendor are not counted.
    #[must_use]
    pub fn list_vendors(&self) -> Vec<VendorCount> {
        let mut vendors: Vec<VendorCount> = Vec::new();
        for product in self.products.iter().filter(|p| !p.vendor.is_empty()) {
            match vendors.iter_mut().find(|v| v.vendor == product.vendor) {
                Some(entry) => entry.product_count += 1,
                None => vendors.push(VendorCount {
                    vendor: product.vendor.clone(),
                    product_count: 1,
                }),
            }
        }
        vendors
    }

    /// Highest variant price across the catalog, in the default currency.
    #[must_use]
    pub fn highest_variant_price(&self) -> Option<Money> {
        self.products
            .iter()
            .flat_map(|product| &product.variants)
            .filter_map(|variant| variant.price.to_decimal())
            .max()
            .map(|max: Decimal| Money::from_decimal(max, self.default_currency().clone()))
    }

    /// Every product other than the given one, in catalog order.
    #[must_use]
    pub fn recommendations(&self, product_id: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.id.as_str() != product_id)
            .collect()
    }

    /// Number of variants across all products.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.by_variant.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"id": "p1", "handle": "polo-azul", "title": "Polo Azul", "vendor": "MiMarca",
         "collections": ["Ropa de Niño", "Verano"],
         "variants": [
            {"id": "v1", "title": "S", "price": {"amount": "10.00", "currencyCode": "S/"}},
            {"id": "v2", "title": "M", "price": {"amount": "12.50", "currencyCode": "S/"}}
         ]},
        {"id": "p2", "handle": "gorra", "title": "Gorra", "vendor": "Otra",
         "collections": ["Verano"],
         "variants": [{"id": "v3", "price": {"amount": "45.00", "currencyCode": "soles"}}]},
        {"id": "p3", "handle": "taza", "title": "Taza", "vendor": "MiMarca",
         "variants": [{"id": "v4", "price": {"amount": "8"}}]},
        {"id": "p4", "handle": "sticker", "title": "Sticker",
         "variants": [{"id": "v5", "price": {"amount": "1.00", "currencyCode": "PEN"}}]}
    ]"#;

    fn store() -> CatalogStore {
        CatalogStore::from_json_str(CATALOG).unwrap()
    }

    #[test]
    fn test_default_currency_from_first_variant() {
        let store = store();
        assert_eq!(store.default_currency().as_str(), "PEN");
        // Missing label resolves to the catalog default
        let (variant, _) = store.lookup_variant("v4").unwrap();
        assert_eq!(variant.price.currency_code.as_str(), "PEN");
    }

    #[test]
    fn test_empty_catalog() {
        let store = CatalogStore::from_json_str("[]").unwrap();
        assert_eq!(store.default_currency().as_str(), "USD");
        assert!(store.list_all().is_empty());
        assert!(store.highest_variant_price().is_none());
        assert!(store.list_vendors().is_empty());
    }

    #[test]
    fn test_lookups() {
        let store = store();
        assert_eq!(store.lookup_by_handle("gorra").unwrap().id.as_str(), "p2");
        assert!(store.lookup_by_handle("missing").is_none());

        let (variant, product) = store.lookup_variant("v2").unwrap();
        assert_eq!(variant.title, "M");
        assert_eq!(product.handle, "polo-azul");
        assert!(store.lookup_variant("nope").is_none());
        assert_eq!(store.variant_count(), 5);
    }

    #[test]
    fn test_collection_listing_by_slug() {
        let store = store();
        let handles: Vec<_> = store
            .list_by_collection_slug("Verano")
            .iter()
            .map(|p| p.handle.as_str())
            .collect();
        assert_eq!(handles, ["polo-azul", "gorra"]);
        assert_eq!(store.list_by_collection_slug("ropa-de-nino").len(), 1);
        assert!(store.list_by_collection_slug("invierno").is_empty());

        let collections = store.list_collections();
        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0].handle, "ropa-de-nino");
        assert_eq!(collections[1].path, "/products/verano");
    }

    #[test]
    fn test_vendor_counts() {
        let vendors = store().list_vendors();
        assert_eq!(
            vendors,
            vec![
                VendorCount { vendor: "MiMarca".into(), product_count: 2 },
                VendorCount { vendor: "Otra".into(), product_count: 1 },
            ]
        );
    }

    #[test]
    fn test_highest_price() {
        let highest = store().highest_variant_price().unwrap();
        assert_eq!(highest.amount, "45.00");
        assert_eq!(highest.currency_code.as_str(), "PEN");
    }

    #[test]
    fn test_recommendations_exclude_product() {
        let store = store();
        let recs = store.recommendations("p1");
        assert_eq!(recs.len(), 3);
        assert!(recs.iter().all(|p| p.id.as_str() != "p1"));
    }

    #[test]
    fn test_duplicate_handle_rejected() {
        let json = r#"[
            {"id": "a", "handle": "same", "variants": [{"id": "v1"}]},
            {"id": "b", "handle": "same", "variants": [{"id": "v2"}]}
        ]"#;
        let err = CatalogStore::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateHandle(h) if h == "same"));
    }

    #[test]
    fn test_duplicate_variant_rejected() {
        let json = r#"[
            {"id": "a", "handle": "one", "variants": [{"id": "v1"}]},
            {"id": "b", "handle": "two", "variants": [{"id": "v1"}]}
        ]"#;
        let err = CatalogStore::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateVariant(v) if v == "v1"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            CatalogStore::from_json_str(r#"{"products": []}"#),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CatalogStore::load(Path::new("/definitely/not/here/products.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(err.to_string().contains("products.json"));
    }
}
