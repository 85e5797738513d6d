//! The storefront facade: every catalog and cart operation a page needs.

use std::sync::Arc;

use vitrina_core::{
    Cart, CartId, CartLineInput, CartLineUpdateInput, Collection, Money, Product,
    ProductConnection, VendorCount,
};

use crate::cart::{CartService, CartStorage, DetachedStorage};
use crate::catalog::{CatalogStore, ProductFilter};

/// Catalog reads and cart operations over one catalog and one cart storage.
#[derive(Debug, Clone)]
pub struct Storefront<S> {
    catalog: Arc<CatalogStore>,
    carts: CartService<S>,
}

impl Storefront<DetachedStorage> {
    /// A storefront for contexts without cart persistence.
    #[must_use]
    pub fn detached(catalog: Arc<CatalogStore>, checkout_url: &str) -> Self {
        Self::new(catalog, DetachedStorage, checkout_url)
    }
}

impl<S: CartStorage> Storefront<S> {
    /// Create a storefront.
    pub fn new(catalog: Arc<CatalogStore>, storage: S, checkout_url: &str) -> Self {
        let carts = CartService::new(catalog.clone(), storage, checkout_url);
        Self { catalog, carts }
    }

    /// The catalog.
    pub const fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    /// The cart service.
    pub const fn carts(&self) -> &CartService<S> {
        &self.carts
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Create an empty cart.
    pub fn create_cart(&self) -> Cart {
        self.carts.create_cart()
    }

    /// Add lines to a cart.
    pub fn add_to_cart(&self, cart_id: &CartId, lines: &[CartLineInput]) -> Cart {
        self.carts.add_lines(cart_id, lines)
    }

    /// Remove lines from a cart.
    pub fn remove_from_cart(&self, cart_id: &CartId, line_ids: &[String]) -> Cart {
        self.carts.remove_lines(cart_id, line_ids)
    }

    /// Update cart lines.
    pub fn update_cart(&self, cart_id: &CartId, lines: &[CartLineUpdateInput]) -> Cart {
        self.carts.update_lines(cart_id, lines)
    }

    /// Fetch a cart.
    pub fn get_cart(&self, cart_id: &CartId) -> Option<Cart> {
        self.carts.get_cart(cart_id)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// A product by handle.
    pub fn get_product(&self, handle: &str) -> Option<&Product> {
        self.catalog.lookup_by_handle(handle)
    }

    /// All products matching a filter, as a single page.
    pub fn get_products(&self, filter: &ProductFilter) -> ProductConnection {
        connection(filter.apply(self.catalog.list_all()))
    }

    /// Products in a collection, as a single page.
    pub fn get_collection_products(&self, slug: &str, filter: &ProductFilter) -> ProductConnection {
        connection(filter.apply(self.catalog.list_by_collection_slug(slug)))
    }

    /// Distinct collections referenced by the catalog.
    pub fn get_collections(&self) -> Vec<Collection> {
        self.catalog.list_collections()
    }

    /// Vendors with product counts.
    pub fn get_vendors(&self) -> Vec<VendorCount> {
        self.catalog.list_vendors()
    }

    /// The highest variant price in the catalog.
    pub fn get_highest_product_price(&self) -> Option<Money> {
        self.catalog.highest_variant_price()
    }

    /// Every product other than the one with `product_id`.
    pub fn get_product_recommendations(&self, product_id: &str) -> Vec<Product> {
        self.catalog
            .recommendations(product_id)
            .into_iter()
            .cloned()
            .collect()
    }
}

fn connection(products: Vec<&Product>) -> ProductConnection {
    ProductConnection::single_page(products.into_iter().cloned().collect())
}
