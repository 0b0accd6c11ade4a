//! Catalog configuration.

use storefront_api::ProductId;

use crate::{DEFAULT_PRICE_MULTIPLIER, DEFAULT_SELECTION};

/// Tunables for [`ProductService`](crate::ProductService).
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Multiplier applied to product prices during enrichment.
    pub price_multiplier: f64,
    /// Product selected before any explicit selection.
    pub initial_selection: Option<ProductId>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            price_multiplier: DEFAULT_PRICE_MULTIPLIER,
            initial_selection: Some(DEFAULT_SELECTION),
        }
    }
}

impl CatalogConfig {
    /// Set the price multiplier.
    pub fn with_price_multiplier(mut self, multiplier: f64) -> Self {
        self.price_multiplier = multiplier;
        self
    }

    /// Set the initial selection.
    pub fn with_initial_selection(mut self, id: Option<ProductId>) -> Self {
        self.initial_selection = id;
        self
    }
}
