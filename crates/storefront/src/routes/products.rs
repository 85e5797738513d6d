//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;
use vitrina_core::{Collection, Money, Product, ProductConnection, VendorCount};

use crate::catalog::{ProductFilter, ProductSortKey};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for product listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub query: Option<String>,
    pub sort: Option<ProductSortKey>,
    pub reverse: Option<bool>,
}

impl From<ListingQuery> for ProductFilter {
    fn from(params: ListingQuery) -> Self {
        Self {
            query: params.query,
            sort_key: params.sort.unwrap_or_default(),
            reverse: params.reverse.unwrap_or(false),
        }
    }
}

/// Product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListingQuery>,
) -> Json<ProductConnection> {
    Json(state.storefront().get_products(&params.into()))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Product>> {
    state
        .storefront()
        .get_product(&handle)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))
}

/// Products to show alongside a product.
#[instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let storefront = state.storefront();
    let product = storefront
        .get_product(&handle)
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))?;
    Ok(Json(
        storefront.get_product_recommendations(product.id.as_str()),
    ))
}

/// Collection listing.
#[instrument(skip(state))]
pub async fn collections(State(state): State<AppState>) -> Json<Vec<Collection>> {
    Json(state.storefront().get_collections())
}

/// Products in a collection. An unknown collection is an empty listing.
#[instrument(skip(state))]
pub async fn collection_products(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ListingQuery>,
) -> Json<ProductConnection> {
    Json(
        state
            .storefront()
            .get_collection_products(&slug, &params.into()),
    )
}

/// Vendors with product counts.
#[instrument(skip(state))]
pub async fn vendors(State(state): State<AppState>) -> Json<Vec<VendorCount>> {
    Json(state.storefront().get_vendors())
}

/// Highest variant price in the catalog.
#[instrument(skip(state))]
pub async fn highest_price(State(state): State<AppState>) -> Result<Json<Money>> {
    state
        .storefront()
        .get_highest_product_price()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("catalog has no priced variants".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_query_defaults() {
        let filter = ProductFilter::from(ListingQuery::default());
        assert_eq!(filter, ProductFilter::default());
    }

    #[test]
    fn test_listing_query_maps_fields() {
        let filter = ProductFilter::from(ListingQuery {
            query: Some("polo".into()),
            sort: Some(ProductSortKey::Vendor),
            reverse: Some(true),
        });
        assert_eq!(filter.query.as_deref(), Some("polo"));
        assert_eq!(filter.sort_key, ProductSortKey::Vendor);
        assert!(filter.reverse);
    }
}
