//! Capability contract between the generic engine and a concrete cache.
//!
//! A concrete cache supplies two things: what a cached item says about
//! itself ([`CacheItem`]) and how to fetch a batch of items for a key
//! ([`ItemSource`]). The engine never sees anything else of the domain.

use async_trait::async_trait;
use quarry_core::{ItemKey, SourceResult};

/// An entity the cache can hold.
///
/// Key and dependency extraction must be pure and derived only from the
/// item's own data, never from the batch that produced it.
pub trait CacheItem: Clone + Send + Sync + 'static {
    /// The key under which this item is cached.
    fn key(&self) -> ItemKey;

    /// Keys of the items this one depends on. Empty for independent
    /// items; must not contain the item's own key.
    fn dependencies(&self) -> Vec<ItemKey>;
}

/// Produces batches of items from the remote source.
///
/// A batch must be non-empty and its first element must carry the
/// requested key; the engine fails the key's entry otherwise. Items after
/// the first are a free by-product that the engine uses to warm the
/// cache.
///
/// `is_dependency` is set when the key is wanted only to satisfy another
/// item's dependency. Some sources fetch a richer payload in that case -
/// a whole hierarchy instead of a single node.
#[async_trait]
pub trait ItemSource: Send + Sync + 'static {
    /// The item type this source produces.
    type Item: CacheItem;

    /// Fetch the item for `key`, plus any items that come along for free.
    async fn fetch_batch(&self, key: &str, is_dependency: bool) -> SourceResult<Vec<Self::Item>>;
}
