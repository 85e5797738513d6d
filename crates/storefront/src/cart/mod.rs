//! Carts.
//!
//! # Architecture
//!
//! ```text
//! CartService ──► CartRepository ──► CartStorage (memory | file | detached)
//!      │                │
//!      └──► CatalogStore ◄── TotalsEngine ──► TaxPolicy
//! ```
//!
//! - [`CartService`] implements the cart operations (create, add, remove,
//!   update, get) as load, mutate, recompute, persist
//! - [`CartRepository`] owns the `cart:<id>` record format and always
//!   recomputes through [`TotalsEngine`] before handing a cart out
//! - [`CartStorage`] is the persistence port; the medium is chosen by the
//!   runtime context

mod repository;
mod service;
mod storage;
mod totals;

pub use repository::{CartRepository, LoadOutcome, storage_key};
pub use service::CartService;
pub use storage::{CartStorage, DetachedStorage, FileStorage, MemoryStorage, StorageError};
pub use totals::{TaxPolicy, TotalsEngine, ZeroTax};
