//! Quarry Cache - Memoizing Fetch Layer
//!
//! Fetches entities from the remote API once and memoizes them. Concurrent
//! demands for the same key share a single in-flight fetch, items returned
//! alongside the requested one seed the cache for free, and entities a
//! fetched item depends on are prefetched in the background.
//!
//! The generic engine lives in [`fetch`]; the capability contract a
//! concrete cache supplies is in [`traits`]; [`list_node`] and [`ontology`]
//! are the concrete caches built on top of it.

pub mod fetch;
pub mod list_node;
pub mod ontology;
pub mod promise;
pub mod store;
pub mod traits;

pub use fetch::{CacheStats, FetchCache};
pub use list_node::{ListFetcher, ListNodeCache, ListNodeSource};
pub use ontology::{OntologyCache, OntologyFetcher, OntologySource};
pub use promise::{Promise, Subscription};
pub use store::EntryStore;
pub use traits::{CacheItem, ItemSource};
