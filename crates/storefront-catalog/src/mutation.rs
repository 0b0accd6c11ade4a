//! Mutation intake.
//!
//! Callers request adds, updates and deletes through [`MutationIntake`].
//! Each request copies the product, tags it with a [`MutationStatus`] and
//! pushes it onto one FIFO queue, which the CRUD worker drains in order.

use std::fmt;
use std::sync::Arc;

use storefront_api::{Product, ProductId};
use tokio::sync::mpsc;
use tracing::debug;

use crate::CatalogError;

/// Lifecycle tag of a product mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MutationStatus {
    #[default]
    Unchanged,
    Added,
    Deleted,
    Updated,
}

impl fmt::Display for MutationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MutationStatus::Unchanged => "unchanged",
            MutationStatus::Added => "added",
            MutationStatus::Deleted => "deleted",
            MutationStatus::Updated => "updated",
        };
        f.write_str(s)
    }
}

/// A product mutation waiting to be dispatched.
///
/// The product may still lack an id: adds are submitted without one.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMutation {
    pub product: Product,
    pub status: MutationStatus,
}

/// A mutation the backend has accepted, ready to be folded.
///
/// Unlike [`PendingMutation`] the product is guaranteed to carry an id, so
/// the fold can always match it against the catalog. For adds the product
/// is the backend's copy (with its assigned id); for updates and deletes it
/// is the product as it was submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedMutation {
    id: ProductId,
    product: Product,
    status: MutationStatus,
}

impl ConfirmedMutation {
    /// Wrap an accepted product. Fails with [`CatalogError::MissingId`] when
    /// the product has no id.
    pub fn new(product: Product, status: MutationStatus) -> Result<Self, CatalogError> {
        let id = product.id.ok_or(CatalogError::MissingId { status })?;
        Ok(Self {
            id,
            product,
            status,
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn status(&self) -> MutationStatus {
        self.status
    }
}

/// Business rule applied to a product before an update is queued.
pub type UpdateRule = Arc<dyn Fn(&mut Product) + Send + Sync>;

/// Default update rule: bump the stock counter by one.
pub fn increment_stock(product: &mut Product) {
    product.quantity_in_stock = Some(product.quantity_in_stock.unwrap_or(0).saturating_add(1));
}

/// The product added when no product is supplied.
pub fn placeholder_product() -> Product {
    Product {
        id: Some(42),
        product_name: "Another One".to_string(),
        product_code: Some("TBX-0042".to_string()),
        description: Some("Our new product".to_string()),
        price: Some(8.9),
        category_id: Some(3),
        category: Some("Toolbox".to_string()),
        quantity_in_stock: Some(30),
        ..Default::default()
    }
}

/// Receiving end of the mutation queue, owned by the CRUD worker.
pub type MutationQueue = mpsc::UnboundedReceiver<PendingMutation>;

/// Entry points for add/update/delete requests.
#[derive(Clone)]
pub struct MutationIntake {
    tx: mpsc::UnboundedSender<PendingMutation>,
    update_rule: UpdateRule,
}

impl MutationIntake {
    /// Create an intake with the default update rule, returning the queue
    /// the worker should drain.
    pub fn channel() -> (Self, MutationQueue) {
        Self::with_update_rule(Arc::new(increment_stock))
    }

    /// Create an intake with a custom update rule.
    pub fn with_update_rule(update_rule: UpdateRule) -> (Self, MutationQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, update_rule }, rx)
    }

    /// Queue an add. Without a product the placeholder product is used.
    pub fn request_add(&self, product: Option<&Product>) -> Result<(), CatalogError> {
        let product = product.cloned().unwrap_or_else(placeholder_product);
        self.push(product, MutationStatus::Added)
    }

    /// Queue an update after applying the update rule to a copy.
    pub fn request_update(&self, product: &Product) -> Result<(), CatalogError> {
        let mut product = product.clone();
        (self.update_rule)(&mut product);
        self.push(product, MutationStatus::Updated)
    }

    /// Queue a delete.
    pub fn request_delete(&self, product: &Product) -> Result<(), CatalogError> {
        self.push(product.clone(), MutationStatus::Deleted)
    }

    fn push(&self, product: Product, status: MutationStatus) -> Result<(), CatalogError> {
        debug!(%status, id = ?product.id, "queueing mutation");
        self.tx
            .send(PendingMutation { product, status })
            .map_err(|_| CatalogError::Closed)
    }
}

impl fmt::Debug for MutationIntake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationIntake")
            .field("closed", &self.tx.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rake() -> Product {
        Product {
            id: Some(1),
            product_name: "Leaf Rake".to_string(),
            quantity_in_stock: Some(30),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_requests_are_queued_in_order() {
        let (intake, mut queue) = MutationIntake::channel();
        let product = rake();

        intake.request_add(Some(&product)).unwrap();
        intake.request_update(&product).unwrap();
        intake.request_delete(&product).unwrap();

        let statuses: Vec<_> = [
            queue.recv().await.unwrap(),
            queue.recv().await.unwrap(),
            queue.recv().await.unwrap(),
        ]
        .into_iter()
        .map(|m| m.status)
        .collect();

        assert_eq!(
            statuses,
            vec![
                MutationStatus::Added,
                MutationStatus::Updated,
                MutationStatus::Deleted
            ]
        );
    }

    #[tokio::test]
    async fn test_update_applies_rule_to_copy() {
        let (intake, mut queue) = MutationIntake::channel();
        let product = rake();

        intake.request_update(&product).unwrap();

        let queued = queue.recv().await.unwrap();
        assert_eq!(queued.product.quantity_in_stock, Some(31));
        // Caller's product is untouched
        assert_eq!(product.quantity_in_stock, Some(30));
    }

    #[tokio::test]
    async fn test_custom_update_rule() {
        let rule: UpdateRule = Arc::new(|p: &mut Product| p.price = Some(1.0));
        let (intake, mut queue) = MutationIntake::with_update_rule(rule);

        intake.request_update(&rake()).unwrap();

        let queued = queue.recv().await.unwrap();
        assert_eq!(queued.product.price, Some(1.0));
        assert_eq!(queued.product.quantity_in_stock, Some(30));
    }

    #[tokio::test]
    async fn test_add_without_product_uses_placeholder() {
        let (intake, mut queue) = MutationIntake::channel();
        intake.request_add(None).unwrap();

        let queued = queue.recv().await.unwrap();
        assert_eq!(queued.product, placeholder_product());
        assert_eq!(queued.status, MutationStatus::Added);
    }

    #[test]
    fn test_increment_stock_from_absent() {
        let mut product = Product::default();
        increment_stock(&mut product);
        assert_eq!(product.quantity_in_stock, Some(1));
    }

    #[test]
    fn test_confirmed_requires_id() {
        let confirmed = ConfirmedMutation::new(rake(), MutationStatus::Updated).unwrap();
        assert_eq!(confirmed.id(), 1);

        let unsaved = Product::default();
        assert_eq!(
            ConfirmedMutation::new(unsaved, MutationStatus::Added),
            Err(CatalogError::MissingId {
                status: MutationStatus::Added
            })
        );
    }

    #[test]
    fn test_request_after_queue_dropped() {
        let (intake, queue) = MutationIntake::channel();
        drop(queue);
        assert_eq!(intake.request_delete(&rake()), Err(CatalogError::Closed));
    }
}
