//! Fetch orchestration.
//!
//! Turns a cache miss into a settled entry: the entry is registered
//! before the fetch is dispatched, the returned batch is validated and
//! its first element resolves the entry, trailing batch items seed their
//! own entries, and keys the batch's items depend on are demanded in the
//! background without blocking the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use quarry_core::{CacheError, CacheResult, ItemKey};

use crate::promise::{Promise, Subscription};
use crate::store::EntryStore;
use crate::traits::{CacheItem, ItemSource};

/// Snapshot of engine counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Demands served from an existing entry, pending or settled.
    pub hits: u64,
    /// Demands that created an entry and dispatched a fetch. Includes
    /// background dependency fetches.
    pub misses: u64,
    /// Background dependency demands dispatched.
    pub prefetches: u64,
    /// Entries currently in the store.
    pub entries: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    prefetches: AtomicU64,
}

/// Generic memoizing cache over an [`ItemSource`].
///
/// Each key is fetched at most once until invalidated: the entry for a
/// key is created synchronously when the key is first demanded, so every
/// later demand - concurrent, recursive, or via a dependency of another
/// item - finds the entry and subscribes instead of fetching again.
///
/// Cloning is by handle; clones share the store and the source.
pub struct FetchCache<S: ItemSource> {
    source: Arc<S>,
    store: Arc<EntryStore<S::Item>>,
    counters: Arc<Counters>,
}

impl<S: ItemSource> Clone for FetchCache<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
            counters: Arc::clone(&self.counters),
        }
    }
}

impl<S: ItemSource> FetchCache<S> {
    /// Create a cache over `source`.
    pub fn new(source: S) -> Self {
        Self::with_source(Arc::new(source))
    }

    /// Create a cache over an already-shared source.
    pub fn with_source(source: Arc<S>) -> Self {
        Self {
            source,
            store: Arc::new(EntryStore::new()),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Get the item for `key`, fetching it if no entry exists yet.
    ///
    /// Concurrent demands for the same key share one fetch and observe
    /// the same outcome, value or error. A failed entry keeps reporting
    /// its error until [`FetchCache::reload`].
    pub async fn get(&self, key: &str) -> CacheResult<S::Item> {
        self.demand(key, false).wait().await
    }

    /// Drop the entry for `key` and fetch it anew.
    ///
    /// Outcomes already handed out stay as they were; only demands made
    /// after this call observe the refreshed value.
    pub async fn reload(&self, key: &str) -> CacheResult<S::Item> {
        self.store.invalidate(key);
        self.get(key).await
    }

    /// Counter snapshot.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            prefetches: self.counters.prefetches.load(Ordering::Relaxed),
            entries: self.store.len() as u64,
        }
    }

    /// Register demand for `key`, creating its entry and dispatching a
    /// fetch if absent.
    ///
    /// Entry creation happens before this returns, so a later demand for
    /// the same key can never race a second fetch; the fetch itself runs
    /// on an independent task.
    fn demand(&self, key: &str, is_dependency: bool) -> Subscription<S::Item> {
        let (promise, created) = self.store.get_or_create(key);
        let subscription = promise.subscribe();

        if !created {
            trace!(key, "cache hit");
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return subscription;
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key, is_dependency, "dispatching fetch");

        let engine = self.clone();
        let key = key.to_owned();
        tokio::spawn(async move {
            engine.run_fetch(key, is_dependency, promise).await;
        });

        subscription
    }

    async fn run_fetch(&self, key: ItemKey, is_dependency: bool, promise: Arc<Promise<S::Item>>) {
        let batch = match self.source.fetch_batch(&key, is_dependency).await {
            Ok(batch) => batch,
            Err(source_error) => {
                self.settle_error(&key, is_dependency, &promise, CacheError::Source(source_error));
                return;
            }
        };

        let Some(first) = batch.first() else {
            let error = CacheError::EmptyBatch { key: key.clone() };
            self.settle_error(&key, is_dependency, &promise, error);
            return;
        };

        let actual = first.key();
        if actual != key {
            let error = CacheError::KeyMismatch {
                requested: key.clone(),
                actual,
            };
            self.settle_error(&key, is_dependency, &promise, error);
            return;
        }

        if !promise.resolve(first.clone()) {
            warn!(key = %key, "entry settled twice; keeping the first outcome");
        }

        // Trailing batch items are free: give each its own resolved entry
        // unless the key is already taken, then walk every item's
        // dependencies. The walk runs only on validated batches.
        for item in &batch {
            self.store.seed(&item.key(), item.clone());

            for dependency in item.dependencies() {
                if self.store.peek(&dependency).is_none() {
                    trace!(key = %key, dependency = %dependency, "prefetching dependency");
                    self.counters.prefetches.fetch_add(1, Ordering::Relaxed);
                    let _ = self.demand(&dependency, true);
                }
            }
        }
    }

    fn settle_error(
        &self,
        key: &str,
        is_dependency: bool,
        promise: &Promise<S::Item>,
        error: CacheError,
    ) {
        if is_dependency {
            // Nobody awaits a background prefetch; the log line is the
            // only immediate trace of the failure. The entry keeps the
            // error for any later direct demand.
            warn!(key, %error, "background prefetch failed");
        } else {
            debug!(key, %error, "fetch failed");
        }
        if !promise.reject(error) {
            warn!(key, "entry settled twice; keeping the first outcome");
        }
    }
}
