//! Reactive product catalog for the storefront.
//!
//! Fetches products, product categories and suppliers once, joins them
//! client-side and keeps a materialized product collection in step with the
//! add/update/delete mutations issued by callers.
//!
//! ## Pipeline
//!
//! ```text
//! products ─┐
//!           ├─ enrich ─┐
//! categories┘          ├─ materialize (FIFO dispatch + fold) ─ selection
//! intake ──────────────┘
//! ```
//!
//! Every stage is a [`Replay`] cell: it is started by its first subscriber,
//! has exactly one writer and replays its latest value to late subscribers.

mod backend;
mod catalog;
mod config;
mod crud;
mod dispatch;
mod enrich;
mod error;
mod mutation;
mod operators;
mod reconcile;
mod replay;
mod selection;
mod service;
mod source;
mod views;

pub use backend::StorefrontBackend;
pub use catalog::Catalog;
pub use config::CatalogConfig;
pub use crud::materialize;
pub use dispatch::Dispatcher;
pub use enrich::{DEFAULT_PRICE_MULTIPLIER, enrich, enrich_product, enrich_products};
pub use error::CatalogError;
pub use mutation::{
    ConfirmedMutation, MutationIntake, MutationQueue, MutationStatus, PendingMutation, UpdateRule,
    increment_stock, placeholder_product,
};
pub use operators::combine_latest;
pub use reconcile::{FoldInput, fold, reconcile};
pub use replay::{Publisher, Replay, Signal, Subscription};
pub use selection::{DEFAULT_SELECTION, SelectionIndex, find_selected};
pub use service::{ProductService, product_categories, suppliers, suppliers_for};
pub use source::remote;
pub use views::{
    ALL_CATEGORIES, ProductListView, ProductListViewModel, ProductSelectionViewModel,
    filter_by_category, selection_view,
};

pub use storefront_api::{
    ApiError, CategoryId, Product, ProductCategory, ProductId, StorefrontClient, Supplier,
    SupplierId,
};
