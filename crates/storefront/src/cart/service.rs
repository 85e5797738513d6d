//! Cart operations.
//!
//! Each mutation is load (or start empty), modify, recompute, save. The
//! returned cart is always the recomputed one, even when the storage medium
//! dropped the write. When the stored record could not be read at all, the
//! mutation is applied to an empty cart that is returned but not saved, so
//! the stored record stays as it was.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;
use vitrina_core::{
    Cart, CartId, CartLine, CartLineInput, CartLineUpdateInput, CartMerchandise, LineId,
};

use super::repository::{CartRepository, LoadOutcome};
use super::storage::CartStorage;
use super::totals::TotalsEngine;
use crate::catalog::{CatalogStore, VariantResolver};

/// Cart operations over a catalog and a storage medium.
#[derive(Debug, Clone)]
pub struct CartService<S> {
    catalog: Arc<CatalogStore>,
    repository: CartRepository<S>,
}

impl<S: CartStorage> CartService<S> {
    /// Create a service with the default (zero) tax policy.
    pub fn new(catalog: Arc<CatalogStore>, storage: S, checkout_url: impl Into<String>) -> Self {
        let totals = TotalsEngine::new(catalog.clone());
        Self::with_totals(catalog, storage, totals, checkout_url)
    }

    /// Create a service with a custom totals engine.
    pub fn with_totals(
        catalog: Arc<CatalogStore>,
        storage: S,
        totals: TotalsEngine,
        checkout_url: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            repository: CartRepository::new(storage, totals, checkout_url),
        }
    }

    /// The repository carts are persisted through.
    pub const fn repository(&self) -> &CartRepository<S> {
        &self.repository
    }

    /// Create and persist an empty cart.
    #[instrument(skip(self))]
    pub fn create_cart(&self) -> Cart {
        let cart = self.empty_cart(CartId::new(format!("cart_{}", Uuid::new_v4().simple())));
        let cart = self.repository.save(cart);
        tracing::info!(cart_id = %cart.id, "Cart created");
        cart
    }

    /// Add lines to a cart, merging by variant.
    ///
    /// Entries naming an unknown variant, or with quantity zero, are skipped.
    #[instrument(skip_all, fields(cart_id = %cart_id, entries = entries.len()))]
    pub fn add_lines(&self, cart_id: &CartId, entries: &[CartLineInput]) -> Cart {
        let (mut cart, persist) = self.load_for_update(cart_id);

        for entry in entries {
            if entry.quantity == 0 {
                continue;
            }
            let Some(resolved) = self.catalog.resolve(&entry.merchandise_id) else {
                tracing::debug!(merchandise = %entry.merchandise_id, "Skipping unknown variant");
                continue;
            };

            if let Some(line) = cart.line_for_variant_mut(&resolved.variant.id) {
                line.quantity = line.quantity.saturating_add(entry.quantity);
            } else {
                cart.lines.push(CartLine::new(
                    resolved.variant,
                    resolved.product,
                    entry.quantity,
                ));
            }
        }

        self.commit(cart, persist)
    }

    /// Remove lines by line ID. Unknown IDs are ignored.
    #[instrument(skip_all, fields(cart_id = %cart_id, lines = line_ids.len()))]
    pub fn remove_lines(&self, cart_id: &CartId, line_ids: &[String]) -> Cart {
        let (mut cart, persist) = self.load_for_update(cart_id);
        let doomed: HashSet<&str> = line_ids.iter().map(String::as_str).collect();
        cart.lines.retain(|line| !doomed.contains(line.id.as_str()));
        self.commit(cart, persist)
    }

    /// Update line quantities and merchandise.
    ///
    /// Quantity zero removes the line. Otherwise the line takes the new
    /// quantity and, when the merchandise ID resolves, a fresh merchandise
    /// snapshot; an unresolved merchandise ID keeps the old snapshot. Entries
    /// naming a line not in the cart are ignored.
    ///
    /// A line switched to another variant is re-keyed to that variant's line
    /// ID. If the cart already has a line for that variant, the updated
    /// quantity is added to it and the switched line is dropped, so line IDs
    /// stay unique.
    #[instrument(skip_all, fields(cart_id = %cart_id, entries = entries.len()))]
    pub fn update_lines(&self, cart_id: &CartId, entries: &[CartLineUpdateInput]) -> Cart {
        let (mut cart, persist) = self.load_for_update(cart_id);

        for entry in entries {
            let Some(index) = cart.lines.iter().position(|line| line.id.as_str() == entry.id) else {
                tracing::debug!(line = %entry.id, "Skipping update for unknown line");
                continue;
            };

            if entry.quantity == 0 {
                cart.lines.remove(index);
                continue;
            }

            let Some(resolved) = self.catalog.resolve(&entry.merchandise_id) else {
                if let Some(line) = cart.lines.get_mut(index) {
                    line.quantity = entry.quantity;
                }
                continue;
            };

            let merchandise = CartMerchandise::snapshot(resolved.variant, resolved.product);
            let variant_line_id = LineId::for_variant(&resolved.variant.id);
            let holder = cart.lines.iter().enumerate().position(|(i, line)| {
                i != index
                    && (line.merchandise.id == resolved.variant.id || line.id == variant_line_id)
            });

            if let Some(holder) = holder {
                cart.lines.remove(index);
                let holder = if holder > index { holder - 1 } else { holder };
                if let Some(line) = cart.lines.get_mut(holder) {
                    line.quantity = line.quantity.saturating_add(entry.quantity);
                    line.merchandise = merchandise;
                }
                continue;
            }

            if let Some(line) = cart.lines.get_mut(index) {
                if line.merchandise.id != resolved.variant.id {
                    line.id = variant_line_id;
                }
                line.merchandise = merchandise;
                line.quantity = entry.quantity;
            }
        }

        self.commit(cart, persist)
    }

    /// Fetch a cart.
    ///
    /// A corrupt record is replaced by a fresh empty cart under the same ID,
    /// which is persisted and returned. A missing cart, an unreadable record,
    /// or no storage at all is `None`.
    #[instrument(skip_all, fields(cart_id = %cart_id))]
    pub fn get_cart(&self, cart_id: &CartId) -> Option<Cart> {
        match self.repository.load(cart_id) {
            LoadOutcome::Loaded(cart) => Some(cart),
            LoadOutcome::Corrupt => {
                tracing::warn!("Replacing corrupt cart with an empty one");
                Some(self.repository.save(self.empty_cart(cart_id.clone())))
            }
            LoadOutcome::Missing | LoadOutcome::Unavailable | LoadOutcome::Failed => None,
        }
    }

    /// The cart to mutate, and whether the result may be saved.
    fn load_for_update(&self, cart_id: &CartId) -> (Cart, bool) {
        match self.repository.load(cart_id) {
            LoadOutcome::Loaded(cart) => (cart, true),
            LoadOutcome::Failed => {
                tracing::warn!(cart_id = %cart_id, "Cart unreadable, changes will not be saved");
                (self.empty_cart(cart_id.clone()), false)
            }
            LoadOutcome::Missing | LoadOutcome::Corrupt | LoadOutcome::Unavailable => {
                (self.empty_cart(cart_id.clone()), true)
            }
        }
    }

    fn commit(&self, cart: Cart, persist: bool) -> Cart {
        if persist {
            self.repository.save(cart)
        } else {
            self.repository.totals().recompute(cart)
        }
    }

    fn empty_cart(&self, id: CartId) -> Cart {
        Cart::empty(
            id,
            self.catalog.default_currency(),
            self.repository.checkout_url(),
        )
    }
}
