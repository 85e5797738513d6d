//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                  - Liveness check
//!
//! # Catalog
//! GET    /api/products?query&sort&reverse         - Product listing
//! GET    /api/products/{handle}                   - Product detail
//! GET    /api/products/{handle}/recommendations   - Other products
//! GET    /api/collections                         - Collection listing
//! GET    /api/collections/{slug}/products         - Products in a collection
//! GET    /api/vendors                             - Vendors with product counts
//! GET    /api/price/highest                       - Highest variant price
//!
//! # Cart
//! POST   /api/cart                                - Create a cart
//! GET    /api/cart/{id}                           - Fetch a cart
//! POST   /api/cart/{id}/lines                     - Add lines
//! PATCH  /api/cart/{id}/lines                     - Update lines
//! DELETE /api/cart/{id}/lines                     - Remove lines
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{handle}", get(products::show))
        .route(
            "/products/{handle}/recommendations",
            get(products::recommendations),
        )
        .route("/collections", get(products::collections))
        .route(
            "/collections/{slug}/products",
            get(products::collection_products),
        )
        .route("/vendors", get(products::vendors))
        .route("/price/highest", get(products::highest_price))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(cart::create))
        .route("/{id}", get(cart::show))
        .route(
            "/{id}/lines",
            post(cart::add).patch(cart::update).delete(cart::remove),
        )
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", catalog_routes().nest("/cart", cart_routes()))
}
