//! Canonical catalog shapes.
//!
//! These are the types the store serves to its consumers and embeds in cart
//! lines. Raw catalog records (with their optional fields and loose currency
//! labels) are mapped into these by the storefront's catalog loader.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};
use super::price::Money;

/// Image shown when a product has no images of its own.
pub const PLACEHOLDER_IMAGE_URL: &str = "/images/product-placeholder.jpg";

// =============================================================================
// Image Types
// =============================================================================

/// Product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl Image {
    /// Default edge length for images that do not declare their size.
    pub const DEFAULT_SIZE: u32 = 800;

    /// The placeholder image for a product without images.
    #[must_use]
    pub fn placeholder(alt_text: &str) -> Self {
        Self {
            url: PLACEHOLDER_IMAGE_URL.to_owned(),
            alt_text: alt_text.to_owned(),
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
        }
    }
}

/// SEO metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    /// Page title for search engines.
    pub title: String,
    /// Meta description.
    pub description: String,
}

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

/// Product option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Available values (e.g., `["Small", "Medium", "Large"]`).
    #[serde(default)]
    pub values: Vec<String>,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant ID, unique across the catalog.
    pub id: VariantId,
    /// Variant title (combination of option values).
    pub title: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    /// Selected options for this variant.
    pub selected_options: Vec<SelectedOption>,
    /// Current price.
    pub price: Money,
}

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
    /// Maximum price among all variants.
    pub max_variant_price: Money,
}

/// Reference from a product to a collection it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    /// Collection title as written in the catalog.
    pub title: String,
    /// Slug of the title.
    pub handle: String,
}

/// A product in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// URL handle, unique across the catalog.
    pub handle: String,
    /// Whether the product is available.
    pub available_for_sale: bool,
    /// Product title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// HTML description.
    pub description_html: String,
    /// Vendor name.
    pub vendor: String,
    /// Product tags.
    pub tags: Vec<String>,
    /// Collections, in catalog order.
    pub collections: Vec<CollectionRef>,
    /// All product images.
    pub images: Vec<Image>,
    /// Product options.
    pub options: Vec<ProductOption>,
    /// Product variants (never empty).
    pub variants: Vec<ProductVariant>,
    /// Price range across variants.
    pub price_range: PriceRange,
    /// Compare-at price (original price if on sale).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Money>,
    /// First image, or the placeholder.
    pub featured_image: Image,
    /// SEO metadata.
    pub seo: Seo,
    /// Last update timestamp, as written in the catalog.
    #[serde(default)]
    pub updated_at: String,
}

// =============================================================================
// Collection Types
// =============================================================================

/// A collection derived from the product records that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// URL handle (slug of the title).
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Storefront page listing the collection (`/products/<handle>`).
    pub path: String,
}

/// Product count for one vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorCount {
    /// Vendor name.
    pub vendor: String,
    /// Number of products from this vendor.
    pub product_count: usize,
}

// =============================================================================
// Pagination Types
// =============================================================================

/// Pagination information.
///
/// The static catalog is served as a single page, so this is always the
/// empty page info; it is kept so consumers written against a paginated
/// backend keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Whether there are items before this page.
    pub has_previous_page: bool,
    /// Cursor for the last item.
    pub end_cursor: String,
}

/// Paginated list of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConnection {
    /// Pagination info.
    pub page_info: PageInfo,
    /// Products in this page.
    pub products: Vec<Product>,
}

impl ProductConnection {
    /// Wrap a full result set as a single page.
    #[must_use]
    pub fn single_page(products: Vec<Product>) -> Self {
        Self {
            page_info: PageInfo::default(),
            products,
        }
    }
}
