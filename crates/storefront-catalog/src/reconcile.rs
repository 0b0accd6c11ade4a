//! Reconciliation fold.
//!
//! Pure transition functions from the current [`Catalog`] and one incoming
//! event to the next catalog. Nothing here mutates its inputs.

use tracing::warn;

use crate::{Catalog, ConfirmedMutation, MutationStatus};

/// One event entering the fold.
#[derive(Debug, Clone, PartialEq)]
pub enum FoldInput {
    /// A fresh enriched base snapshot. Replaces the accumulator.
    Seed(Catalog),
    /// A mutation accepted by the backend.
    Confirmed(ConfirmedMutation),
}

/// Apply one fold input.
///
/// A seed always replaces the accumulator wholesale, so re-seeding never
/// accumulates across snapshots. A confirmed mutation without a prior seed
/// is applied to an empty catalog.
pub fn fold(acc: Option<&Catalog>, input: FoldInput) -> Catalog {
    match input {
        FoldInput::Seed(snapshot) => snapshot,
        FoldInput::Confirmed(confirmed) => match acc {
            Some(acc) => reconcile(acc, &confirmed),
            None => reconcile(&Catalog::default(), &confirmed),
        },
    }
}

/// Apply a confirmed mutation to a catalog.
///
/// - `Added` appends the product. If its id is already present the existing
///   entry is replaced in place, so ids stay unique.
/// - `Updated` replaces the entry with the same id; no-op if absent.
/// - `Deleted` removes the entry with the same id; no-op if absent.
/// - `Unchanged` returns the catalog as is.
pub fn reconcile(acc: &Catalog, incoming: &ConfirmedMutation) -> Catalog {
    let product = incoming.product();
    let id = Some(incoming.id());

    match incoming.status() {
        MutationStatus::Added => {
            if acc.iter().any(|p| p.id == id) {
                warn!(?id, "added product already present, replacing");
                return replace(acc, incoming);
            }
            acc.iter().cloned().chain(Some(product.clone())).collect()
        }
        MutationStatus::Updated => {
            if !acc.iter().any(|p| p.id == id) {
                warn!(?id, "updated product not in catalog, ignoring");
                return acc.clone();
            }
            replace(acc, incoming)
        }
        MutationStatus::Deleted => acc.iter().filter(|p| p.id != id).cloned().collect(),
        MutationStatus::Unchanged => acc.clone(),
    }
}

fn replace(acc: &Catalog, incoming: &ConfirmedMutation) -> Catalog {
    acc.iter()
        .map(|p| {
            if p.id == Some(incoming.id()) {
                incoming.product().clone()
            } else {
                p.clone()
            }
        })
        .collect()
}
