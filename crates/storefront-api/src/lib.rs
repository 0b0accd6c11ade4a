//! REST client for the storefront product backend.
//!
//! This crate provides a thin client over the backend's JSON collections,
//! including the product CRUD endpoints and the read-only dimension
//! collections (product categories and suppliers).
//!
//! ## Features
//!
//! - **HTTP Client**: collection reads and product writes
//! - **Types**: wire representations of products, categories and suppliers
//! - **Errors**: transport and backend failures normalized to one message

mod client;
mod error;
mod records;
mod types;

pub use client::StorefrontClient;
pub use error::ApiError;
pub use records::*;
pub use types::*;
