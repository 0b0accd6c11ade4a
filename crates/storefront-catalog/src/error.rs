//! Error types for the catalog pipeline.

use storefront_api::{ApiError, CategoryId, ProductId};
use thiserror::Error;

use crate::MutationStatus;

/// Errors carried by catalog streams.
///
/// Every variant owns plain data so the same error can be replayed to each
/// subscriber of a cell. Transport and backend failures are flattened to
/// their display message at the fetch/dispatch boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Reading a collection failed.
    #[error("{message}")]
    Fetch {
        collection: &'static str,
        message: String,
    },

    /// A mutation's network write failed.
    #[error("{message}")]
    Dispatch {
        status: MutationStatus,
        id: Option<ProductId>,
        message: String,
    },

    /// A product references a category that is not in the category list.
    #[error("no category {category_id:?} for product {product_id:?}")]
    MissingCategory {
        product_id: Option<ProductId>,
        category_id: Option<CategoryId>,
    },

    /// A product that must carry an identifier has none.
    #[error("{status} product has no id")]
    MissingId { status: MutationStatus },

    /// The stream or queue ended before producing a value.
    #[error("catalog stream closed")]
    Closed,
}

impl CatalogError {
    /// Normalize a failed collection read.
    pub fn fetch(collection: &'static str, err: &ApiError) -> Self {
        CatalogError::Fetch {
            collection,
            message: err.to_string(),
        }
    }

    /// Normalize a failed mutation write.
    pub fn dispatch(status: MutationStatus, id: Option<ProductId>, err: &ApiError) -> Self {
        CatalogError::Dispatch {
            status,
            id,
            message: err.to_string(),
        }
    }
}
