//! Replay-latest cells.
//!
//! A [`Replay`] is a multicast cache holding the most recent emission of one
//! derived value. It is backed by a `tokio::sync::watch` channel: the single
//! [`Publisher`] replaces the stored [`Signal`] and every [`Subscription`] is
//! woken. New subscriptions observe the stored signal immediately.
//!
//! Lazy cells run their activation the first time anyone subscribes, so a
//! network fetch or a driver task is started exactly once no matter how many
//! subscribers arrive later.
//!
//! Values coalesce, failures do not: the cell counts every failure it is
//! given, so a subscription that was not polled while a failure was
//! overwritten by a newer value still reports that failure before the value.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::trace;

use crate::CatalogError;

/// State held by a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal<T> {
    /// Nothing emitted yet.
    Pending,
    /// Latest emitted value.
    Value(T),
    /// The producer reported an error.
    Failed(CatalogError),
}

impl<T> Signal<T> {
    /// The value, if the cell currently holds one.
    pub fn value(&self) -> Option<&T> {
        match self {
            Signal::Value(v) => Some(v),
            _ => None,
        }
    }
}

type Activation<T> = Box<dyn FnOnce(Publisher<T>) + Send>;

/// What the watch channel carries: the current signal plus a failure log
/// that survives coalescing.
struct Slot<T> {
    signal: Signal<T>,
    failures: u64,
    last_failure: Option<CatalogError>,
}

struct Shared<T> {
    tx: watch::Sender<Slot<T>>,
    activation: Mutex<Option<Activation<T>>>,
}

/// A replay-latest multicast cell.
pub struct Replay<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Replay<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for Replay<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replay")
            .field("subscribers", &self.shared.tx.receiver_count())
            .finish_non_exhaustive()
    }
}

impl<T> Replay<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an eagerly available cell and its writer.
    pub fn channel(initial: Signal<T>) -> (Self, Publisher<T>) {
        let replay = Self::from_activation(initial, None);
        let publisher = Publisher {
            shared: Arc::clone(&replay.shared),
        };
        (replay, publisher)
    }

    /// Create a cell whose writer is handed to `activate` on first subscribe.
    pub fn lazy<F>(activate: F) -> Self
    where
        F: FnOnce(Publisher<T>) + Send + 'static,
    {
        Self::from_activation(Signal::Pending, Some(Box::new(activate)))
    }

    fn from_activation(initial: Signal<T>, activation: Option<Activation<T>>) -> Self {
        let (tx, _) = watch::channel(Slot {
            signal: initial,
            failures: 0,
            last_failure: None,
        });
        Self {
            shared: Arc::new(Shared {
                tx,
                activation: Mutex::new(activation),
            }),
        }
    }

    /// Subscribe to the cell, starting its producer if needed.
    ///
    /// The first call to [`Subscription::next`] yields the stored value (or
    /// error) right away when the cell is not pending. The subscription ends
    /// after the first error it yields.
    pub fn subscribe(&self) -> Subscription<T> {
        self.open(true)
    }

    /// Like [`subscribe`](Self::subscribe), but errors are reported without
    /// ending the subscription, so the caller sees the cell recover.
    ///
    /// Derived cells follow their inputs this way.
    pub fn follow(&self) -> Subscription<T> {
        self.open(false)
    }

    fn open(&self, terminal: bool) -> Subscription<T> {
        let mut rx = self.shared.tx.subscribe();
        rx.mark_changed();
        let seen_failures = rx.borrow().failures;
        self.activate();
        Subscription {
            rx,
            seen_failures,
            backlog: false,
            terminal,
            finished: false,
        }
    }

    /// Wait for the first value.
    pub async fn first(&self) -> Result<T, CatalogError> {
        self.subscribe().next().await.unwrap_or(Err(CatalogError::Closed))
    }

    /// Snapshot of the stored signal. Does not start the producer.
    pub fn current(&self) -> Signal<T> {
        self.shared.tx.borrow().signal.clone()
    }

    /// The stored value, if any. Does not start the producer.
    pub fn latest(&self) -> Option<T> {
        self.shared.tx.borrow().signal.value().cloned()
    }

    /// Whether the lazy producer has been started.
    pub fn is_active(&self) -> bool {
        self.shared
            .activation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn activate(&self) {
        let activation = self
            .shared
            .activation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(activate) = activation {
            trace!("activating replay cell");
            activate(Publisher {
                shared: Arc::clone(&self.shared),
            });
        }
    }
}

/// The single writer of a [`Replay`] cell.
pub struct Publisher<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Publisher<T> {
    /// Replace the stored value and notify subscribers.
    pub fn publish(&self, value: T) {
        self.shared.tx.send_modify(|slot| slot.signal = Signal::Value(value));
    }

    /// Replace the stored value with an error and notify subscribers.
    pub fn fail(&self, error: CatalogError) {
        self.shared.tx.send_modify(|slot| {
            slot.failures += 1;
            slot.last_failure = Some(error.clone());
            slot.signal = Signal::Failed(error);
        });
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.shared.tx.receiver_count()
    }
}

/// A receiver of a [`Replay`] cell's emissions.
///
/// Values published faster than they are consumed are coalesced: the
/// subscription always resumes at the newest value. Failures are not lost to
/// coalescing; when several were missed the most recent one is reported.
/// Subscriptions from [`Replay::subscribe`] end at their first error, those
/// from [`Replay::follow`] keep going.
pub struct Subscription<T> {
    rx: watch::Receiver<Slot<T>>,
    seen_failures: u64,
    /// The stored signal has not been yielded yet even though the channel
    /// has been marked seen.
    backlog: bool,
    terminal: bool,
    finished: bool,
}

impl<T: Clone> Subscription<T> {
    /// Wait for the next emission.
    ///
    /// Returns `None` once a terminal subscription has yielded an error or
    /// the cell's writer is gone.
    pub async fn next(&mut self) -> Option<Result<T, CatalogError>> {
        if self.finished {
            return None;
        }

        loop {
            if !std::mem::take(&mut self.backlog) && self.rx.changed().await.is_err() {
                self.finished = true;
                return None;
            }

            let (signal, missed) = {
                let slot = self.rx.borrow_and_update();
                let missed = match slot.signal {
                    Signal::Failed(_) => None,
                    _ if slot.failures > self.seen_failures => slot.last_failure.clone(),
                    _ => None,
                };
                self.seen_failures = slot.failures;
                (slot.signal.clone(), missed)
            };

            if let Some(error) = missed {
                trace!("reporting failure overwritten before it was observed");
                self.backlog = true;
                return self.failed(error);
            }

            match signal {
                Signal::Pending => continue,
                Signal::Value(value) => return Some(Ok(value)),
                Signal::Failed(error) => return self.failed(error),
            }
        }
    }

    fn failed(&mut self, error: CatalogError) -> Option<Result<T, CatalogError>> {
        if self.terminal {
            self.finished = true;
        }
        Some(Err(error))
    }

    /// The value currently stored in the cell, without waiting.
    pub fn latest(&self) -> Option<T> {
        self.rx.borrow().signal.value().cloned()
    }

    /// Whether the subscription has ended.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
