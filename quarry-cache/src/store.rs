//! Keyed store of cache entries.
//!
//! Maps each key to the promise of its item. `get_or_create` is atomic
//! with respect to concurrent callers: exactly one caller observes
//! `created = true` for any given entry, which is what limits every key
//! to a single in-flight fetch.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use quarry_core::ItemKey;

use crate::promise::Promise;

/// Map from key to promised item.
///
/// Entries never change once inserted; they leave the map only through
/// [`EntryStore::invalidate`]. The map shard lock is held only for the
/// check-and-insert itself, never across an await.
#[derive(Debug)]
pub struct EntryStore<T> {
    entries: DashMap<ItemKey, Arc<Promise<T>>>,
}

impl<T: Clone> Default for EntryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> EntryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Return the entry for `key`, inserting a pending one if absent.
    ///
    /// The flag is true iff this call created the entry. Only the caller
    /// that observes `true` may dispatch a fetch for the key; everyone
    /// else subscribes to the returned promise.
    pub fn get_or_create(&self, key: &str) -> (Arc<Promise<T>>, bool) {
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => {
                let promise = Arc::new(Promise::pending());
                entry.insert(Arc::clone(&promise));
                (promise, true)
            }
        }
    }

    /// Non-creating lookup.
    pub fn peek(&self, key: &str) -> Option<Arc<Promise<T>>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Insert an already-resolved entry iff `key` has none. Returns
    /// whether the item was written.
    pub fn seed(&self, key: &str, item: T) -> bool {
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(Promise::resolved(item)));
                true
            }
        }
    }

    /// Remove the entry for `key` if present.
    ///
    /// Promises already handed out are unaffected and keep whatever
    /// outcome they settled with.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Number of entries, settled or pending.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
