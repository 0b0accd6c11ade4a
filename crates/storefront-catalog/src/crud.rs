//! The CRUD worker: FIFO dispatch folded into the materialized catalog.
//!
//! One task owns the accumulator. It alternates between two inputs:
//!
//! 1. Seeds from the enriched product cell, which replace the accumulator.
//! 2. Mutations from the intake queue, taken one at a time. Each mutation's
//!    write is awaited and its result folded before the next is dequeued,
//!    so two writes are never in flight together.
//!
//! Mutations queued before the first seed wait until it arrives.

use tracing::{debug, error, trace};

use crate::{
    Catalog, CatalogError, Dispatcher, FoldInput, MutationQueue, PendingMutation, Replay, fold,
};

enum Step {
    Seed(Option<Result<Catalog, CatalogError>>),
    Mutation(Option<PendingMutation>),
}

/// Materialize the catalog from its enriched seed and the mutation queue.
///
/// The returned cell is lazy: the worker starts with its first subscriber
/// and every fold result is replayed to later subscribers. A failed write
/// or seed is published as the cell's error; the accumulator is kept and the
/// next successful fold publishes a value again.
pub fn materialize(
    seed: &Replay<Catalog>,
    queue: MutationQueue,
    dispatcher: Dispatcher,
) -> Replay<Catalog> {
    let seed = seed.clone();

    Replay::lazy(move |publisher| {
        let mut seeds = seed.follow();
        let mut queue = queue;

        tokio::spawn(async move {
            let mut acc: Option<Catalog> = None;
            let mut seeds_open = true;

            loop {
                let step = tokio::select! {
                    biased;
                    item = seeds.next(), if seeds_open => Step::Seed(item),
                    mutation = queue.recv(), if acc.is_some() => Step::Mutation(mutation),
                    else => break,
                };

                match step {
                    Step::Seed(Some(Ok(snapshot))) => {
                        debug!(count = snapshot.len(), "seeding catalog");
                        let next = fold(acc.as_ref(), FoldInput::Seed(snapshot));
                        publisher.publish(next.clone());
                        acc = Some(next);
                    }
                    Step::Seed(Some(Err(e))) => {
                        error!(error = %e, "catalog seed failed");
                        publisher.fail(e);
                    }
                    Step::Seed(None) => {
                        trace!("catalog seed completed");
                        seeds_open = false;
                    }
                    Step::Mutation(Some(mutation)) => match dispatcher.dispatch(mutation).await {
                        Ok(Some(confirmed)) => {
                            let next = fold(acc.as_ref(), FoldInput::Confirmed(confirmed));
                            debug!(count = next.len(), "folded confirmed mutation");
                            publisher.publish(next.clone());
                            acc = Some(next);
                        }
                        Ok(None) => {}
                        Err(e) => {
                            error!(error = %e, "mutation dispatch failed");
                            publisher.fail(e);
                        }
                    },
                    Step::Mutation(None) => {
                        trace!("mutation intake closed");
                        break;
                    }
                }
            }

            debug!("crud worker stopped");
        });
    })
}
