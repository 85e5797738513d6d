//! Core types for Vitrina.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod catalog;
pub mod currency;
pub mod id;
pub mod price;

pub use cart::{
    Cart, CartCost, CartLine, CartLineCost, CartLineInput, CartLineUpdateInput, CartMerchandise,
    DEFAULT_CHECKOUT_URL,
};
pub use catalog::{
    Collection, CollectionRef, Image, PLACEHOLDER_IMAGE_URL, PageInfo, PriceRange, Product,
    ProductConnection, ProductOption, ProductVariant, SelectedOption, Seo, VendorCount,
};
pub use currency::CurrencyNormalizer;
pub use id::*;
pub use price::{CurrencyCode, Money};
