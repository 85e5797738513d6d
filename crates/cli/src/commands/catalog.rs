//! Catalog file commands.
//!
//! # Usage
//!
//! ```bash
//! # Check that a catalog loads the way the storefront will load it
//! vitrina catalog validate data/products.json
//!
//! # Append a single-variant product
//! vitrina catalog add data/products.json --title "Polo Pima" --price 59.90 --currency PEN \
//!     --vendor "Textil Andina" --tag ropa,verano --collection Ropa --image /images/polo.jpg
//!
//! # Vendors, collections and the highest price
//! vitrina catalog stats data/products.json
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Args;
use rand::Rng;
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;
use vitrina_core::{CurrencyCode, Money, VendorCount, slugify};
use vitrina_storefront::catalog::{
    AmountRecord, CatalogError, CatalogStore, ImageRecord, PriceRecord, ProductRecord,
    VariantRecord,
};

/// Image size written for imported images.
const IMPORTED_IMAGE_SIZE: u32 = 1024;

/// Attempts at a random handle suffix before falling back to a UUID.
const SUFFIX_ATTEMPTS: usize = 32;

/// Errors from catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// The product title is blank.
    #[error("title is required")]
    EmptyTitle,

    /// The title or handle has no characters usable in a handle.
    #[error("cannot derive a handle from {0:?}")]
    EmptyHandle(String),

    /// A price is not a decimal number.
    #[error("invalid price {0:?}")]
    InvalidPrice(String),

    /// The catalog file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not a JSON array.
    #[error("catalog is not a JSON array: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog does not load.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Fields for a new product.
#[derive(Debug, Clone, Default, Args)]
pub struct NewProduct {
    /// Product title
    #[arg(long)]
    pub title: String,

    /// URL handle (default: derived from the title)
    #[arg(long)]
    pub handle: Option<String>,

    /// Price of the default variant
    #[arg(long, default_value = "0")]
    pub price: String,

    /// Compare-at price
    #[arg(long)]
    pub compare_at_price: Option<String>,

    /// Currency code or label
    #[arg(long, default_value = CurrencyCode::FALLBACK)]
    pub currency: String,

    /// Title of the default variant
    #[arg(long, default_value = "Default")]
    pub variant_title: String,

    /// Vendor name
    #[arg(long)]
    pub vendor: Option<String>,

    /// Plain text description
    #[arg(long)]
    pub description: Option<String>,

    /// Tags (repeat or separate with commas)
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Collection titles (repeat or separate with commas)
    #[arg(long = "collection", value_delimiter = ',')]
    pub collections: Vec<String>,

    /// Image URLs, first one is featured
    #[arg(long = "image")]
    pub images: Vec<String>,
}

/// Counts reported by `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSummary {
    pub products: usize,
    pub variants: usize,
    pub vendors: usize,
    pub collections: usize,
    pub default_currency: CurrencyCode,
}

/// Aggregates reported by `stats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub vendors: Vec<VendorCount>,
    pub collections: Vec<String>,
    pub highest_price: Option<Money>,
}

// =============================================================================
// Commands
// =============================================================================

/// Load a catalog the way the storefront does and summarize it.
///
/// # Errors
///
/// Returns `CatalogCommandError::Catalog` if the catalog does not load.
pub fn validate(path: &Path) -> Result<CatalogSummary, CatalogCommandError> {
    let store = CatalogStore::load(path)?;
    Ok(CatalogSummary {
        products: store.list_all().len(),
        variants: store.variant_count(),
        vendors: store.list_vendors().len(),
        collections: store.list_collections().len(),
        default_currency: store.default_currency().clone(),
    })
}

/// Vendors, collections and the highest price of a catalog.
///
/// # Errors
///
/// Returns `CatalogCommandError::Catalog` if the catalog does not load.
pub fn stats(path: &Path) -> Result<CatalogStats, CatalogCommandError> {
    let store = CatalogStore::load(path)?;
    Ok(CatalogStats {
        vendors: store.list_vendors(),
        collections: store
            .list_collections()
            .into_iter()
            .map(|collection| collection.title)
            .collect(),
        highest_price: store.highest_variant_price(),
    })
}

/// Append a single-variant product to a catalog file.
///
/// A missing file is treated as an empty catalog. If the handle is taken, a
/// random `-<0..999>` suffix is appended. The file is only rewritten if the
/// resulting catalog still loads.
///
/// # Errors
///
/// Returns `CatalogCommandError` for a blank title, an unusable handle, an
/// invalid price, an unreadable catalog file, or a resulting catalog that
/// does not load.
pub fn add(
    path: &Path,
    input: NewProduct,
    rng: &mut impl Rng,
) -> Result<ProductRecord, CatalogCommandError> {
    let title = input.title.trim().to_owned();
    if title.is_empty() {
        return Err(CatalogCommandError::EmptyTitle);
    }

    let handle_source = input
        .handle
        .as_deref()
        .map(str::trim)
        .filter(|handle| !handle.is_empty())
        .unwrap_or(&title);
    let base_handle = slugify(handle_source);
    if base_handle.is_empty() {
        return Err(CatalogCommandError::EmptyHandle(handle_source.to_owned()));
    }

    let price = parse_price(&input.price)?;
    let compare_at_price = input.compare_at_price.as_deref().map(parse_price).transpose()?;

    let mut entries = read_entries(path)?;
    let taken: HashSet<&str> = entries
        .iter()
        .filter_map(|entry| entry.get("handle").and_then(Value::as_str))
        .collect();
    let handle = unique_handle(&base_handle, &taken, rng);

    let description = input.description.filter(|d| !d.trim().is_empty());
    let record = ProductRecord {
        id: format!("prod_{}", Uuid::new_v4().simple()),
        handle,
        available_for_sale: Some(true),
        description_html: description.clone(),
        description,
        vendor: input.vendor.filter(|v| !v.trim().is_empty()),
        tags: clean_list(input.tags),
        collections: clean_list(input.collections),
        images: clean_list(input.images)
            .into_iter()
            .map(|url| ImageRecord {
                url,
                alt_text: Some(title.clone()),
                width: Some(IMPORTED_IMAGE_SIZE),
                height: Some(IMPORTED_IMAGE_SIZE),
            })
            .collect(),
        options: Vec::new(),
        variants: vec![VariantRecord {
            id: format!("var_{}", Uuid::new_v4().simple()),
            title: Some(input.variant_title),
            available_for_sale: Some(true),
            selected_options: Vec::new(),
            price: PriceRecord {
                amount: Some(AmountRecord::Text(price)),
                currency_code: Some(input.currency.trim().to_uppercase()),
            },
        }],
        compare_at_price: compare_at_price.map(AmountRecord::Text),
        seo: None,
        updated_at: None,
        title,
    };

    entries.push(serde_json::to_value(&record)?);
    let json = serde_json::to_string_pretty(&entries)?;

    // Refuse to write a catalog the storefront would reject
    CatalogStore::from_json_str(&json)?;

    std::fs::write(path, format!("{json}\n")).map_err(|source| CatalogCommandError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(handle = %record.handle, id = %record.id, "Product added");
    Ok(record)
}

// =============================================================================
// Output
// =============================================================================

/// Print a validation summary.
pub fn print_summary(path: &Path, summary: &CatalogSummary) {
    #[allow(clippy::print_stdout)]
    {
        println!("{} is valid", path.display());
        println!("  products:    {}", summary.products);
        println!("  variants:    {}", summary.variants);
        println!("  vendors:     {}", summary.vendors);
        println!("  collections: {}", summary.collections);
        println!("  currency:    {}", summary.default_currency);
    }
}

/// Print catalog stats.
pub fn print_stats(stats: &CatalogStats) {
    #[allow(clippy::print_stdout)]
    {
        println!("Vendors:");
        for vendor in &stats.vendors {
            println!("  {} ({})", vendor.vendor, vendor.product_count);
        }
        println!("Collections:");
        for collection in &stats.collections {
            println!("  {collection}");
        }
        match &stats.highest_price {
            Some(price) => println!("Highest price: {} {}", price.amount, price.currency_code),
            None => println!("Highest price: -"),
        }
    }
}

/// Print the record that was added.
pub fn print_added(record: &ProductRecord) {
    #[allow(clippy::print_stdout)]
    {
        println!("Added {} ({})", record.handle, record.id);
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_price(raw: &str) -> Result<String, CatalogCommandError> {
    let trimmed = raw.trim();
    match Decimal::from_str(trimmed) {
        Ok(amount) if amount.is_sign_negative() => {
            Err(CatalogCommandError::InvalidPrice(raw.to_owned()))
        }
        Ok(_) => Ok(trimmed.to_owned()),
        Err(_) => Err(CatalogCommandError::InvalidPrice(raw.to_owned())),
    }
}

/// Read the catalog as raw JSON values so fields this tool does not know
/// about survive the rewrite.
fn read_entries(path: &Path) -> Result<Vec<Value>, CatalogCommandError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(CatalogCommandError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn unique_handle(base: &str, taken: &HashSet<&str>, rng: &mut impl Rng) -> String {
    if !taken.contains(base) {
        return base.to_owned();
    }
    for _ in 0..SUFFIX_ATTEMPTS {
        let candidate = format!("{base}-{}", rng.random_range(0..1000));
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }
    format!("{base}-{}", Uuid::new_v4().simple())
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn product(title: &str) -> NewProduct {
        NewProduct {
            title: title.to_owned(),
            price: "0".to_owned(),
            currency: "USD".to_owned(),
            variant_title: "Default".to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_creates_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let mut rng = StdRng::seed_from_u64(7);

        let record = add(
            &path,
            NewProduct {
                price: "59.90".to_owned(),
                currency: "soles".to_owned(),
                tags: vec!["ropa".into(), " ".into()],
                images: vec!["/images/polo.jpg".into()],
                ..product("Polo Pima Niño")
            },
            &mut rng,
        )
        .unwrap();

        assert_eq!(record.handle, "polo-pima-nino");
        assert!(record.id.starts_with("prod_"));
        assert_eq!(record.tags, ["ropa"]);
        assert_eq!(record.images[0].alt_text.as_deref(), Some("Polo Pima Niño"));
        assert_eq!(record.images[0].width, Some(1024));
        assert!(record.variants[0].id.starts_with("var_"));

        let summary = validate(&path).unwrap();
        assert_eq!(summary.products, 1);
        assert_eq!(summary.default_currency.as_str(), "PEN");
    }

    #[test]
    fn test_handle_collision_gets_numeric_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let mut rng = StdRng::seed_from_u64(42);

        add(&path, product("Gorra"), &mut rng).unwrap();
        let second = add(&path, product("Gorra"), &mut rng).unwrap();

        let suffix = second.handle.strip_prefix("gorra-").unwrap();
        assert!(suffix.parse::<u32>().unwrap() < 1000);
        assert_eq!(validate(&path).unwrap().products, 2);
    }

    #[test]
    fn test_explicit_handle_is_slugified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let record = add(
            &path,
            NewProduct {
                handle: Some("  Edición Limitada! ".into()),
                ..product("Taza")
            },
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(record.handle, "edicion-limitada");
    }

    #[test]
    fn test_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let mut rng = StdRng::seed_from_u64(1);

        assert!(matches!(
            add(&path, product("   "), &mut rng),
            Err(CatalogCommandError::EmptyTitle)
        ));
        assert!(matches!(
            add(&path, product("!!!"), &mut rng),
            Err(CatalogCommandError::EmptyHandle(_))
        ));
        assert!(matches!(
            add(
                &path,
                NewProduct {
                    price: "doce".into(),
                    ..product("Taza")
                },
                &mut rng
            ),
            Err(CatalogCommandError::InvalidPrice(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_unknown_fields_survive_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(
            &path,
            r#"[{"id": "p1", "handle": "taza", "title": "Taza", "internalNote": "keep",
                 "variants": [{"id": "v1", "price": {"amount": "5", "currencyCode": "PEN"}}]}]"#,
        )
        .unwrap();

        add(&path, product("Plato"), &mut StdRng::seed_from_u64(3)).unwrap();

        let entries: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["internalNote"], "keep");
    }

    #[test]
    fn test_stats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let mut rng = StdRng::seed_from_u64(5);

        for (title, price, vendor) in [("Uno", "10", "A"), ("Dos", "25.50", "B"), ("Tres", "3", "A")] {
            add(
                &path,
                NewProduct {
                    price: price.into(),
                    vendor: Some(vendor.into()),
                    collections: vec!["Hogar".into()],
                    ..product(title)
                },
                &mut rng,
            )
            .unwrap();
        }

        let stats = stats(&path).unwrap();
        assert_eq!(stats.vendors[0].vendor, "A");
        assert_eq!(stats.vendors[0].product_count, 2);
        assert_eq!(stats.collections, ["Hogar"]);
        assert_eq!(stats.highest_price.unwrap().amount, "25.50");
    }

    #[test]
    fn test_validate_reports_catalog_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, r#"[{"id": "p1", "handle": "x", "variants": []}]"#).unwrap();

        assert!(matches!(
            validate(&path),
            Err(CatalogCommandError::Catalog(CatalogError::EmptyVariants(_)))
        ));
    }
}
