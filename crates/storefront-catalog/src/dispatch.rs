//! Mutation dispatcher.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{CatalogError, ConfirmedMutation, MutationStatus, PendingMutation, StorefrontBackend};

/// Issues the network write for one mutation and reports what to fold.
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn StorefrontBackend>,
}

impl Dispatcher {
    /// Create a dispatcher writing to `backend`.
    pub fn new(backend: Arc<dyn StorefrontBackend>) -> Self {
        Self { backend }
    }

    /// Send one mutation to the backend.
    ///
    /// Returns the confirmed mutation to fold, or `None` for an `Unchanged`
    /// mutation, which is never sent.
    #[tracing::instrument(skip(self, mutation), fields(status = %mutation.status, id = ?mutation.product.id))]
    pub async fn dispatch(
        &self,
        mutation: PendingMutation,
    ) -> Result<Option<ConfirmedMutation>, CatalogError> {
        let PendingMutation {
            mut product,
            status,
        } = mutation;

        let confirmed = match status {
            MutationStatus::Added => {
                // The backend assigns ids
                product.id = None;
                let created = self
                    .backend
                    .create_product(&product)
                    .await
                    .map_err(|e| CatalogError::dispatch(status, None, &e))?;
                info!(id = ?created.id, name = %created.product_name, "product created");
                created
            }
            MutationStatus::Updated => {
                let id = product.id.ok_or(CatalogError::MissingId { status })?;
                self.backend
                    .replace_product(id, &product)
                    .await
                    .map_err(|e| CatalogError::dispatch(status, Some(id), &e))?;
                info!(id, "product updated");
                product
            }
            MutationStatus::Deleted => {
                let id = product.id.ok_or(CatalogError::MissingId { status })?;
                self.backend
                    .delete_product(id)
                    .await
                    .map_err(|e| CatalogError::dispatch(status, Some(id), &e))?;
                info!(id, "product deleted");
                product
            }
            MutationStatus::Unchanged => {
                warn!("unchanged mutation reached the dispatcher, skipping");
                return Ok(None);
            }
        };

        // A create response without an id is rejected here
        ConfirmedMutation::new(confirmed, status).map(Some)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}
