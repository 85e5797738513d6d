//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::{CartStorage, FileStorage, MemoryStorage, StorageError};
use crate::catalog::{CatalogError, CatalogStore};
use crate::config::StorefrontConfig;
use crate::store::Storefront;

/// Error building application state at start-up.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Cart storage as shared by the running server.
pub type SharedStorage = Arc<dyn CartStorage>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the storefront.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: Storefront<SharedStorage>,
}

impl AppState {
    /// Create application state from already-built parts.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Arc<CatalogStore>,
        storage: SharedStorage,
    ) -> Self {
        let storefront = Storefront::new(catalog, storage, &config.checkout_url);
        Self {
            inner: Arc::new(AppStateInner { config, storefront }),
        }
    }

    /// Load the catalog and open cart storage as configured.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the catalog cannot be loaded or the cart
    /// directory cannot be created.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = Arc::new(CatalogStore::load(&config.catalog_path)?);

        let storage: SharedStorage = match &config.cart_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "Persisting carts to disk");
                Arc::new(FileStorage::open(dir.clone())?)
            }
            None => {
                tracing::info!("VITRINA_CART_DIR not set; carts are kept in memory");
                Arc::new(MemoryStorage::new())
            }
        };

        Ok(Self::new(config, catalog, storage))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the storefront.
    #[must_use]
    pub fn storefront(&self) -> &Storefront<SharedStorage> {
        &self.inner.storefront
    }
}
