//! Single-assignment broadcast cell.
//!
//! A [`Promise`] decouples "a value will eventually exist" from "how many
//! parties want it": it settles at most once, with a value or an error,
//! and every subscription, taken before or after settlement, observes the
//! same terminal outcome.

use quarry_core::{CacheError, CacheResult};
use tokio::sync::watch;

/// A write-once cell observable by any number of subscribers.
#[derive(Debug)]
pub struct Promise<T> {
    cell: watch::Sender<Option<CacheResult<T>>>,
}

impl<T: Clone> Promise<T> {
    /// Create a pending promise.
    pub fn pending() -> Self {
        Self {
            cell: watch::Sender::new(None),
        }
    }

    /// Create a promise already settled with a value. Used for items a
    /// batch carried along before anyone asked for them.
    pub fn resolved(value: T) -> Self {
        Self {
            cell: watch::Sender::new(Some(Ok(value))),
        }
    }

    /// Create a promise already settled with an error.
    pub fn rejected(error: CacheError) -> Self {
        Self {
            cell: watch::Sender::new(Some(Err(error))),
        }
    }

    /// Whether the promise has settled.
    pub fn is_settled(&self) -> bool {
        self.cell.borrow().is_some()
    }

    /// Snapshot of the settled outcome, without waiting. None while
    /// pending.
    pub fn outcome(&self) -> Option<CacheResult<T>> {
        self.cell.borrow().clone()
    }

    /// Settle with a value.
    ///
    /// Returns false, leaving the original outcome intact, if the promise
    /// had already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settle with an error. Same exclusivity as [`Promise::resolve`].
    pub fn reject(&self, error: CacheError) -> bool {
        self.settle(Err(error))
    }

    fn settle(&self, outcome: CacheResult<T>) -> bool {
        self.cell.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(outcome);
            true
        })
    }

    /// Subscribe to the eventual outcome. Callable any number of times,
    /// concurrently, and after settlement.
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            outcome: self.cell.subscribe(),
        }
    }
}

/// A handle to a [`Promise`]'s eventual outcome.
#[derive(Debug, Clone)]
pub struct Subscription<T> {
    outcome: watch::Receiver<Option<CacheResult<T>>>,
}

impl<T: Clone> Subscription<T> {
    /// Wait for the promise to settle and return its outcome.
    ///
    /// Returns immediately if the promise already settled. Yields
    /// [`CacheError::Abandoned`] only when every handle to a still-pending
    /// promise has been dropped, meaning nothing can settle it anymore.
    pub async fn wait(mut self) -> CacheResult<T> {
        match self.outcome.wait_for(Option::is_some).await {
            Ok(settled) => settled.clone().unwrap_or(Err(CacheError::Abandoned)),
            Err(_) => Err(CacheError::Abandoned),
        }
    }
}
