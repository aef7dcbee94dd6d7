//! Memoizing cache for hierarchical list nodes.
//!
//! A node demanded directly is fetched on its own. A node demanded as a
//! dependency is always a list root, so the whole list is fetched in one
//! round trip and every node of it seeds the cache.

use std::sync::Arc;

use async_trait::async_trait;
use quarry_core::{CacheResult, ItemKey, ListNode, SourceResult};

use crate::fetch::{CacheStats, FetchCache};
use crate::traits::{CacheItem, ItemSource};

impl CacheItem for ListNode {
    fn key(&self) -> ItemKey {
        self.id.clone()
    }

    /// Every node depends on its list's root, so the whole list gets
    /// prefetched the first time any of its nodes is seen.
    fn dependencies(&self) -> Vec<ItemKey> {
        self.has_root_node.iter().cloned().collect()
    }
}

/// Transport collaborator for the list routes.
#[async_trait]
pub trait ListFetcher: Send + Sync + 'static {
    /// Fetch a single node, without children.
    async fn node(&self, node_iri: &str) -> SourceResult<ListNode>;

    /// Fetch the whole list rooted at `list_iri`, children included.
    async fn list(&self, list_iri: &str) -> SourceResult<ListNode>;
}

/// Batch source over a [`ListFetcher`].
pub struct ListNodeSource<F> {
    fetcher: Arc<F>,
}

impl<F> ListNodeSource<F> {
    /// Wrap a fetcher.
    pub fn new(fetcher: Arc<F>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl<F: ListFetcher> ItemSource for ListNodeSource<F> {
    type Item = ListNode;

    async fn fetch_batch(&self, key: &str, is_dependency: bool) -> SourceResult<Vec<ListNode>> {
        if is_dependency {
            // The key is a root another node pointed at: fetch the whole
            // list and flatten it root-first, so the root resolves the
            // demand and every other node comes along for free.
            let root = self.fetcher.list(key).await?;
            Ok(root.flatten())
        } else {
            let node = self.fetcher.node(key).await?;
            Ok(vec![node])
        }
    }
}

/// Memoizing cache for list nodes.
pub struct ListNodeCache<F: ListFetcher> {
    cache: FetchCache<ListNodeSource<F>>,
}

impl<F: ListFetcher> Clone for ListNodeCache<F> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<F: ListFetcher> ListNodeCache<F> {
    /// Create a cache over `fetcher`.
    pub fn new(fetcher: F) -> Self {
        Self::with_fetcher(Arc::new(fetcher))
    }

    /// Create a cache over an already-shared fetcher.
    pub fn with_fetcher(fetcher: Arc<F>) -> Self {
        Self {
            cache: FetchCache::new(ListNodeSource::new(fetcher)),
        }
    }

    /// Get a list node by IRI, from the cache or from the source.
    pub async fn get_node(&self, node_iri: &str) -> CacheResult<ListNode> {
        self.cache.get(node_iri).await
    }

    /// Drop the cached node and fetch it anew.
    pub async fn reload_node(&self, node_iri: &str) -> CacheResult<ListNode> {
        self.cache.reload(node_iri).await
    }

    /// Counter snapshot.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
