//! Cart persistence.
//!
//! Carts are stored as JSON under `cart:<id>`. Reading is lenient about the
//! cart envelope (ID, checkout URL, cost) and strict about lines: a record
//! whose lines cannot be read is reported as corrupt rather than silently
//! emptied, so callers can tell "no cart" from "broken cart".

use serde_json::{Map, Value};
use vitrina_core::{Cart, CartCost, CartId, CartLine};

use super::storage::CartStorage;
use super::totals::TotalsEngine;

/// Storage key for a cart.
#[must_use]
pub fn storage_key(cart_id: &CartId) -> String {
    format!("cart:{cart_id}")
}

/// Result of loading a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A cart was found, recomputed and written back.
    Loaded(Cart),
    /// No record under this ID.
    Missing,
    /// A record exists but is unreadable.
    Corrupt,
    /// There is no storage in this context.
    Unavailable,
    /// The storage medium failed to read the record. Whatever is stored is
    /// left as is.
    Failed,
}

impl LoadOutcome {
    /// The loaded cart, if any.
    #[must_use]
    pub fn into_cart(self) -> Option<Cart> {
        match self {
            Self::Loaded(cart) => Some(cart),
            Self::Missing | Self::Corrupt | Self::Unavailable | Self::Failed => None,
        }
    }
}

/// Loads and saves carts through a [`CartStorage`].
///
/// Storage write failures are logged and swallowed; the caller always gets
/// the recomputed cart back.
#[derive(Debug, Clone)]
pub struct CartRepository<S> {
    storage: S,
    totals: TotalsEngine,
    checkout_url: String,
}

impl<S: CartStorage> CartRepository<S> {
    /// Create a repository.
    pub fn new(storage: S, totals: TotalsEngine, checkout_url: impl Into<String>) -> Self {
        Self {
            storage,
            totals,
            checkout_url: checkout_url.into(),
        }
    }

    /// The underlying storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// The totals engine used on every load and save.
    pub const fn totals(&self) -> &TotalsEngine {
        &self.totals
    }

    /// Checkout URL for carts that do not carry a usable one.
    pub fn checkout_url(&self) -> &str {
        &self.checkout_url
    }

    /// Load a cart, recompute its totals and persist the result.
    pub fn load(&self, cart_id: &CartId) -> LoadOutcome {
        if !self.storage.is_available() {
            return LoadOutcome::Unavailable;
        }

        let raw = match self.storage.read(&storage_key(cart_id)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LoadOutcome::Missing,
            Err(e) => {
                tracing::warn!(cart_id = %cart_id, error = %e, "Failed to read cart");
                return LoadOutcome::Failed;
            }
        };

        let Some(cart) = self.parse_record(cart_id, &raw) else {
            tracing::warn!(cart_id = %cart_id, "Stored cart is corrupt");
            return LoadOutcome::Corrupt;
        };

        LoadOutcome::Loaded(self.save(cart))
    }

    /// Recompute a cart's totals, persist it and return it.
    pub fn save(&self, cart: Cart) -> Cart {
        let cart = self.totals.recompute(cart);
        if !self.storage.is_available() {
            return cart;
        }

        match serde_json::to_string(&cart) {
            Ok(json) => {
                if let Err(e) = self.storage.write(&storage_key(&cart.id), &json) {
                    tracing::warn!(cart_id = %cart.id, error = %e, "Failed to persist cart");
                }
            }
            Err(e) => {
                tracing::warn!(cart_id = %cart.id, error = %e, "Failed to serialize cart");
            }
        }
        cart
    }

    /// Read a stored record, filling envelope defaults.
    ///
    /// The storage key is authoritative for the cart ID; a record carrying a
    /// different `id` is re-keyed to the one it was stored under.
    fn parse_record(&self, cart_id: &CartId, raw: &str) -> Option<Cart> {
        let Ok(Value::Object(mut record)) = serde_json::from_str::<Value>(raw) else {
            return None;
        };

        let checkout_url = match record.remove("checkoutUrl") {
            Some(Value::String(url)) if !url.is_empty() && url != "#" => url,
            _ => self.checkout_url.clone(),
        };

        let cost = match record.remove("cost") {
            None | Some(Value::Null) => CartCost::zero(self.totals.catalog().default_currency()),
            Some(value) => serde_json::from_value(value).ok()?,
        };

        let lines = read_lines(&mut record)?;

        Some(Cart {
            id: cart_id.clone(),
            checkout_url,
            cost,
            lines,
            total_quantity: 0,
        })
    }
}

/// Lines are optional, but if present as an array every entry must parse.
fn read_lines(record: &mut Map<String, Value>) -> Option<Vec<CartLine>> {
    match record.remove("lines") {
        Some(lines @ Value::Array(_)) => serde_json::from_value(lines).ok(),
        _ => Some(Vec::new()),
    }
}
