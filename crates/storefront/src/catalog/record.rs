//! Raw catalog records and their mapping to canonical products.
//!
//! The catalog file is written by hand and by import tooling, so every field
//! except `id` and `handle` is optional here. Defaults are applied in
//! [`ProductRecord::into_product`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vitrina_core::{
    CollectionRef, CurrencyCode, CurrencyNormalizer, Image, Money, PriceRange, Product,
    ProductId, ProductOption, ProductVariant, SelectedOption, Seo, VariantId, slugify,
};

use super::CatalogError;

/// A decimal amount as found in the catalog: a string or a bare JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountRecord {
    /// `"19.90"`
    Text(String),
    /// `19.9`
    Number(serde_json::Number),
}

impl AmountRecord {
    fn into_amount(self) -> String {
        match self {
            Self::Text(text) if !text.trim().is_empty() => text.trim().to_owned(),
            Self::Text(_) => "0".to_owned(),
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Price as found in the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    /// Amount, missing means zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountRecord>,
    /// Free-form currency label (`"S/"`, `"USD"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
}

/// Image as found in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Image URL.
    pub url: String,
    /// Alt text; defaults to the product title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    /// Width in pixels; missing or zero means 800.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Height in pixels; missing or zero means 800.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Variant as found in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    /// Variant ID, unique across the whole catalog.
    pub id: String,
    /// Variant title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Availability; defaults to available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_for_sale: Option<bool>,
    /// Selected options.
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    /// Price.
    #[serde(default)]
    pub price: PriceRecord,
}

/// Product as found in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Product ID.
    pub id: String,
    /// URL handle, unique across the catalog.
    pub handle: String,
    /// Availability; defaults to available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_for_sale: Option<bool>,
    /// Product title.
    #[serde(default)]
    pub title: String,
    /// Plain text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// HTML description; defaults to the plain description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    /// Vendor name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Collection titles.
    #[serde(default)]
    pub collections: Vec<String>,
    /// Images, first one is featured.
    #[serde(default)]
    pub images: Vec<ImageRecord>,
    /// Product options.
    #[serde(default)]
    pub options: Vec<ProductOption>,
    /// Variants; a product without variants is rejected at load.
    #[serde(default)]
    pub variants: Vec<VariantRecord>,
    /// Compare-at price amount, in the product's currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<AmountRecord>,
    /// SEO metadata; defaults to title and description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ProductRecord {
    /// Raw currency label of the first variant, if any.
    pub(super) fn first_currency_label(&self) -> Option<&str> {
        self.variants
            .first()
            .and_then(|variant| variant.price.currency_code.as_deref())
    }

    /// Map the record to the canonical product shape.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyVariants`] if the record has no variants.
    pub fn into_product(self, normalizer: &CurrencyNormalizer) -> Result<Product, CatalogError> {
        if self.variants.is_empty() {
            return Err(CatalogError::EmptyVariants(self.handle));
        }

        let variants: Vec<ProductVariant> = self
            .variants
            .into_iter()
            .map(|variant| convert_variant(variant, normalizer))
            .collect();

        let currency = variants.first().map_or_else(
            || normalizer.default_currency().clone(),
            |variant| variant.price.currency_code.clone(),
        );
        let price_range = price_range(&variants, &currency);

        let title = self.title;
        let images: Vec<Image> = self
            .images
            .into_iter()
            .map(|image| convert_image(image, &title))
            .collect();
        let featured_image = images
            .first()
            .cloned()
            .unwrap_or_else(|| Image::placeholder(&title));

        let description = self.description.unwrap_or_default();
        let description_html = self
            .description_html
            .filter(|html| !html.is_empty())
            .unwrap_or_else(|| description.clone());
        let seo = self.seo.unwrap_or_else(|| Seo {
            title: title.clone(),
            description: description.clone(),
        });

        let collections = self
            .collections
            .into_iter()
            .filter(|collection| !collection.trim().is_empty())
            .map(|collection| CollectionRef {
                handle: slugify(&collection),
                title: collection,
            })
            .collect();

        Ok(Product {
            id: ProductId::new(self.id),
            handle: self.handle,
            available_for_sale: self.available_for_sale.unwrap_or(true),
            title,
            description,
            description_html,
            vendor: self.vendor.unwrap_or_default(),
            tags: self.tags,
            collections,
            images,
            options: self.options,
            variants,
            price_range,
            compare_at_price: self
                .compare_at_price
                .map(|amount| Money::new(amount.into_amount(), currency.clone())),
            featured_image,
            seo,
            updated_at: self.updated_at.unwrap_or_default(),
        })
    }
}

fn convert_variant(record: VariantRecord, normalizer: &CurrencyNormalizer) -> ProductVariant {
    let amount = record
        .price
        .amount
        .map_or_else(|| "0".to_owned(), AmountRecord::into_amount);
    let currency = normalizer.normalize(record.price.currency_code.as_deref());

    ProductVariant {
        id: VariantId::new(record.id),
        title: record.title.unwrap_or_default(),
        available_for_sale: record.available_for_sale.unwrap_or(true),
        selected_options: record.selected_options,
        price: Money::new(amount, currency),
    }
}

fn convert_image(record: ImageRecord, product_title: &str) -> Image {
    let size = |value: Option<u32>| value.filter(|v| *v > 0).unwrap_or(Image::DEFAULT_SIZE);
    Image {
        url: record.url,
        alt_text: record
            .alt_text
            .filter(|alt| !alt.is_empty())
            .unwrap_or_else(|| product_title.to_owned()),
        width: size(record.width),
        height: size(record.height),
    }
}

/// Min and max over the variants' parseable prices; zero when none parse.
fn price_range(variants: &[ProductVariant], currency: &CurrencyCode) -> PriceRange {
    let (min, max) = variants
        .iter()
        .filter_map(|v| v.price.to_decimal())
        .fold(None, |acc: Option<(Decimal, Decimal)>, price| match acc {
            None => Some((price, price)),
            Some((min, max)) => Some((price.min(min), price.max(max))),
        })
        .unwrap_or_default();

    PriceRange {
        min_variant_price: Money::from_decimal(min, currency.clone()),
        max_variant_price: Money::from_decimal(max, currency.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ProductRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_minimal_record_gets_defaults() {
        let record = parse(
            r#"{"id": "p1", "handle": "shirt", "title": "Shirt",
                "variants": [{"id": "v1", "price": {"amount": "10.00", "currencyCode": "S/"}}]}"#,
        );
        let product = record.into_product(&CurrencyNormalizer::default()).unwrap();

        assert!(product.available_for_sale);
        assert_eq!(product.description, "");
        assert!(product.tags.is_empty());
        assert_eq!(product.featured_image, Image::placeholder("Shirt"));
        assert_eq!(product.variants[0].price.currency_code.as_str(), "PEN");
        assert_eq!(product.variants[0].title, "");
        assert!(product.variants[0].available_for_sale);
        assert_eq!(product.seo.title, "Shirt");
    }

    #[test]
    fn test_numeric_amounts_and_missing_price() {
        let record = parse(
            r#"{"id": "p1", "handle": "h", "variants": [
                {"id": "v1", "price": {"amount": 12.5, "currencyCode": "USD"}},
                {"id": "v2"}
            ]}"#,
        );
        let product = record.into_product(&CurrencyNormalizer::default()).unwrap();
        assert_eq!(product.variants[0].price.amount, "12.5");
        assert_eq!(product.variants[1].price.amount, "0");
        assert_eq!(product.variants[1].price.currency_code.as_str(), "USD");
    }

    #[test]
    fn test_price_range_spans_variants() {
        let record = parse(
            r#"{"id": "p1", "handle": "h", "variants": [
                {"id": "v1", "price": {"amount": "25.00", "currencyCode": "PEN"}},
                {"id": "v2", "price": {"amount": "9.90", "currencyCode": "PEN"}}
            ]}"#,
        );
        let product = record.into_product(&CurrencyNormalizer::default()).unwrap();
        assert_eq!(product.price_range.min_variant_price.amount, "9.90");
        assert_eq!(product.price_range.max_variant_price.amount, "25.00");
    }

    #[test]
    fn test_images_default_size_and_alt() {
        let record = parse(
            r#"{"id": "p1", "handle": "h", "title": "Mug",
                "images": [{"url": "/a.jpg", "width": 0}, {"url": "/b.jpg", "altText": "Back", "width": 640, "height": 480}],
                "variants": [{"id": "v1"}]}"#,
        );
        let product = record.into_product(&CurrencyNormalizer::default()).unwrap();
        assert_eq!(product.images[0].alt_text, "Mug");
        assert_eq!(product.images[0].width, 800);
        assert_eq!(product.images[1].height, 480);
        assert_eq!(product.featured_image.url, "/a.jpg");
    }

    #[test]
    fn test_collections_are_slugged() {
        let record = parse(
            r#"{"id": "p1", "handle": "h", "collections": ["Ropa de Niño", ""], "variants": [{"id": "v1"}]}"#,
        );
        let product = record.into_product(&CurrencyNormalizer::default()).unwrap();
        assert_eq!(product.collections.len(), 1);
        assert_eq!(product.collections[0].handle, "ropa-de-nino");
        assert_eq!(product.collections[0].title, "Ropa de Niño");
    }

    #[test]
    fn test_description_html_falls_back() {
        let record = parse(
            r#"{"id": "p1", "handle": "h", "description": "Soft cotton", "variants": [{"id": "v1"}]}"#,
        );
        let product = record.into_product(&CurrencyNormalizer::default()).unwrap();
        assert_eq!(product.description_html, "Soft cotton");
    }

    #[test]
    fn test_no_variants_is_rejected() {
        let record = parse(r#"{"id": "p1", "handle": "empty"}"#);
        let err = record.into_product(&CurrencyNormalizer::default()).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyVariants(handle) if handle == "empty"));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let record = parse(
            r#"{"id": "p1", "handle": "h", "legacySku": "X-1", "variants": [{"id": "v1", "weight": 3}]}"#,
        );
        assert!(record.into_product(&CurrencyNormalizer::default()).is_ok());
    }
}
