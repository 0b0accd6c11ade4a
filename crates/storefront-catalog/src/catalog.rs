//! The materialized product collection.

use std::ops::Deref;
use std::sync::Arc;

use storefront_api::{Product, ProductId};

/// An immutable, cheaply cloned snapshot of products, unique by id.
///
/// Every product in a catalog is in the unchanged state: mutation status
/// only exists on the [`PendingMutation`](crate::PendingMutation) and
/// [`ConfirmedMutation`](crate::ConfirmedMutation) envelopes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Arc<[Product]>,
}

impl Catalog {
    /// Wrap a list of products.
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into(),
        }
    }

    /// Find a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == Some(id))
    }

    /// Whether a product with this id is present.
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Ids in collection order.
    pub fn ids(&self) -> Vec<Option<ProductId>> {
        self.products.iter().map(|p| p.id).collect()
    }

    /// Copy the products out.
    pub fn to_vec(&self) -> Vec<Product> {
        self.products.to_vec()
    }
}

impl Deref for Catalog {
    type Target = [Product];

    fn deref(&self) -> &Self::Target {
        &self.products
    }
}

impl From<Vec<Product>> for Catalog {
    fn from(products: Vec<Product>) -> Self {
        Self::new(products)
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self {
            products: iter.into_iter().collect(),
        }
    }
}
