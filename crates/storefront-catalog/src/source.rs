//! Cached broadcast sources for remote collections.

use std::future::Future;

use tracing::{debug, error};

use crate::{CatalogError, Replay};

/// Wrap a one-shot fetch in a replay-latest cell.
///
/// The fetch runs once, when the cell gets its first subscriber. Its result
/// (value or error) is replayed to every current and future subscriber.
/// Nothing is retried.
pub fn remote<T, F, Fut>(collection: &'static str, fetch: F) -> Replay<T>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, CatalogError>> + Send + 'static,
{
    Replay::lazy(move |publisher| {
        debug!(collection, "starting collection fetch");
        tokio::spawn(async move {
            match fetch().await {
                Ok(value) => {
                    debug!(collection, "collection fetched");
                    publisher.publish(value);
                }
                Err(e) => {
                    error!(collection, error = %e, "collection fetch failed");
                    publisher.fail(e);
                }
            }
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fetch_runs_once_for_many_subscribers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = remote("numbers", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1u64, 2, 3])
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let first = source.first().await.unwrap();
        let second = source.first().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_reaches_every_subscriber() {
        let source = remote::<Vec<u64>, _, _>("numbers", || async {
            Err(CatalogError::Fetch {
                collection: "numbers",
                message: "An error occurred: connection refused".to_string(),
            })
        });

        let mut a = source.subscribe();
        let mut b = source.subscribe();
        let err_a = a.next().await.unwrap().unwrap_err();
        let err_b = b.next().await.unwrap().unwrap_err();
        assert_eq!(err_a, err_b);
        assert_eq!(err_a.to_string(), "An error occurred: connection refused");
    }
}
