//! Derived cells: projection and combine-latest.
//!
//! Each operator returns a lazy [`Replay`] whose driver task follows its
//! inputs from first use. An upstream error is forwarded and the driver keeps
//! running, so the derived cell recovers with its input. An error from the
//! operator's own function ends the driver. An input that completes keeps
//! its last value.

use tracing::trace;

use crate::{CatalogError, Replay};

impl<T> Replay<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Derive a cell by applying `f` to every emission.
    pub fn map<U, F>(&self, f: F) -> Replay<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + 'static,
    {
        self.try_map(move |value| Ok(f(value)))
    }

    /// Derive a cell by applying a fallible `f` to every emission.
    ///
    /// The first `Err` returned by `f` is published as the cell's error and
    /// stops the cell.
    pub fn try_map<U, F>(&self, f: F) -> Replay<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> Result<U, CatalogError> + Send + 'static,
    {
        let upstream = self.clone();
        Replay::lazy(move |publisher| {
            let mut input = upstream.follow();
            tokio::spawn(async move {
                while let Some(item) = input.next().await {
                    let value = match item {
                        Ok(value) => value,
                        Err(e) => {
                            publisher.fail(e);
                            continue;
                        }
                    };
                    match f(&value) {
                        Ok(derived) => publisher.publish(derived),
                        Err(e) => {
                            publisher.fail(e);
                            return;
                        }
                    }
                }
                trace!("map input completed");
            });
        })
    }
}

/// Combine the latest values of two cells.
///
/// Emits once both inputs have a value, then again whenever either input
/// re-emits. Inputs are not paired up: a burst on one side is combined with
/// whatever the other side last held.
pub fn combine_latest<A, B, C, F>(left: &Replay<A>, right: &Replay<B>, f: F) -> Replay<C>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
    F: Fn(&A, &B) -> Result<C, CatalogError> + Send + 'static,
{
    let (left, right) = (left.clone(), right.clone());

    Replay::lazy(move |publisher| {
        let mut lhs = left.follow();
        let mut rhs = right.follow();

        tokio::spawn(async move {
            let mut latest_left: Option<A> = None;
            let mut latest_right: Option<B> = None;
            let (mut left_open, mut right_open) = (true, true);

            while left_open || right_open {
                let failure = tokio::select! {
                    item = lhs.next(), if left_open => match item {
                        Some(Ok(value)) => {
                            latest_left = Some(value);
                            None
                        }
                        Some(Err(e)) => Some(e),
                        None => {
                            left_open = false;
                            continue;
                        }
                    },
                    item = rhs.next(), if right_open => match item {
                        Some(Ok(value)) => {
                            latest_right = Some(value);
                            None
                        }
                        Some(Err(e)) => Some(e),
                        None => {
                            right_open = false;
                            continue;
                        }
                    },
                };

                if let Some(e) = failure {
                    trace!(error = %e, "combine_latest input failed");
                    publisher.fail(e);
                    continue;
                }

                if let (Some(a), Some(b)) = (&latest_left, &latest_right) {
                    match f(a, b) {
                        Ok(combined) => publisher.publish(combined),
                        Err(e) => {
                            publisher.fail(e);
                            return;
                        }
                    }
                }
            }
            trace!("combine_latest inputs completed");
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Signal;

    #[tokio::test]
    async fn test_map_follows_upstream() {
        let (source, publisher) = Replay::channel(Signal::Value(2u64));
        let doubled = source.map(|v| v * 2);

        let mut sub = doubled.subscribe();
        assert_eq!(sub.next().await, Some(Ok(4)));

        publisher.publish(5);
        assert_eq!(sub.next().await, Some(Ok(10)));
    }

    #[tokio::test]
    async fn test_try_map_error_is_published() {
        let (source, _publisher) = Replay::channel(Signal::Value(0u64));
        let checked = source.try_map(|v| {
            if *v == 0 {
                Err(CatalogError::Closed)
            } else {
                Ok(*v)
            }
        });

        assert_eq!(checked.first().await, Err(CatalogError::Closed));
    }

    #[tokio::test]
    async fn test_combine_latest_waits_for_both() {
        let (left, left_tx) = Replay::<u64>::channel(Signal::Pending);
        let (right, right_tx) = Replay::<&'static str>::channel(Signal::Pending);
        let combined = combine_latest(&left, &right, |n, s| Ok(format!("{s}{n}")));

        let mut sub = combined.subscribe();
        left_tx.publish(1);
        right_tx.publish("a");
        assert_eq!(sub.next().await, Some(Ok("a1".to_string())));

        // Re-emission on one side recombines with the other side's latest
        left_tx.publish(2);
        assert_eq!(sub.next().await, Some(Ok("a2".to_string())));
        right_tx.publish("b");
        assert_eq!(sub.next().await, Some(Ok("b2".to_string())));
    }

    #[tokio::test]
    async fn test_combine_latest_forwards_error() {
        let (left, _left_tx) = Replay::<u64>::channel(Signal::Value(1));
        let (right, right_tx) = Replay::<u64>::channel(Signal::Value(1));
        let combined = combine_latest(&left, &right, |a, b| Ok(a + b));

        let mut sub = combined.subscribe();
        assert_eq!(sub.next().await, Some(Ok(2)));

        right_tx.fail(CatalogError::Closed);
        assert_eq!(sub.next().await, Some(Err(CatalogError::Closed)));
    }

    #[tokio::test]
    async fn test_combine_latest_recovers_after_input_error() {
        let (left, left_tx) = Replay::<u64>::channel(Signal::Value(1));
        let (right, _right_tx) = Replay::<u64>::channel(Signal::Value(10));
        let combined = combine_latest(&left, &right, |a, b| Ok(a + b));

        let mut follower = combined.follow();
        assert_eq!(follower.next().await, Some(Ok(11)));

        left_tx.fail(CatalogError::Closed);
        assert_eq!(follower.next().await, Some(Err(CatalogError::Closed)));

        left_tx.publish(2);
        assert_eq!(follower.next().await, Some(Ok(12)));

        // A subscriber arriving after recovery sees the value, not the error
        assert_eq!(combined.first().await, Ok(12));
    }

    #[tokio::test]
    async fn test_map_recovers_after_input_error() {
        let (source, publisher) = Replay::<u64>::channel(Signal::Value(1));
        let doubled = source.map(|v| v * 2);

        let mut follower = doubled.follow();
        assert_eq!(follower.next().await, Some(Ok(2)));

        publisher.fail(CatalogError::Closed);
        publisher.publish(4);

        assert_eq!(follower.next().await, Some(Err(CatalogError::Closed)));
        assert_eq!(follower.next().await, Some(Ok(8)));
    }
}
