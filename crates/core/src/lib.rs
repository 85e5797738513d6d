//! Vitrina Core - Shared types library.
//!
//! This crate provides the domain types used across all Vitrina components:
//! - `storefront` - Catalog & cart store plus its JSON API
//! - `cli` - Command-line tools for maintaining the static catalog file
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! persistence, no HTTP. This keeps it lightweight and allows it to be used
//! anywhere (including by the catalog tooling, which never touches carts).
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, currency normalization, catalog and cart shapes
//! - [`slug`] - URL-safe slugs for handles and collection paths

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod slug;
pub mod types;

pub use slug::slugify;
pub use types::*;
