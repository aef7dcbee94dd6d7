//! Memoizing cache for ontology definitions.
//!
//! Ontologies come back one per request; what makes them interesting to
//! the cache is their import graph, which is walked in the background
//! and may contain cycles.

use std::sync::Arc;

use async_trait::async_trait;
use quarry_core::{CacheResult, ItemKey, Ontology, SourceResult};

use crate::fetch::{CacheStats, FetchCache};
use crate::traits::{CacheItem, ItemSource};

impl CacheItem for Ontology {
    fn key(&self) -> ItemKey {
        self.id.clone()
    }

    fn dependencies(&self) -> Vec<ItemKey> {
        self.depends_on.clone()
    }
}

/// Transport collaborator for the ontology route.
#[async_trait]
pub trait OntologyFetcher: Send + Sync + 'static {
    /// Fetch a single ontology definition.
    async fn ontology(&self, ontology_iri: &str) -> SourceResult<Ontology>;
}

/// Batch source over an [`OntologyFetcher`]. The dependency flag does
/// not change the payload shape; batches always hold the one requested
/// ontology.
pub struct OntologySource<F> {
    fetcher: Arc<F>,
}

impl<F> OntologySource<F> {
    /// Wrap a fetcher.
    pub fn new(fetcher: Arc<F>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl<F: OntologyFetcher> ItemSource for OntologySource<F> {
    type Item = Ontology;

    async fn fetch_batch(&self, key: &str, _is_dependency: bool) -> SourceResult<Vec<Ontology>> {
        let ontology = self.fetcher.ontology(key).await?;
        Ok(vec![ontology])
    }
}

/// Memoizing cache for ontologies.
pub struct OntologyCache<F: OntologyFetcher> {
    cache: FetchCache<OntologySource<F>>,
}

impl<F: OntologyFetcher> Clone for OntologyCache<F> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<F: OntologyFetcher> OntologyCache<F> {
    /// Create a cache over `fetcher`.
    pub fn new(fetcher: F) -> Self {
        Self::with_fetcher(Arc::new(fetcher))
    }

    /// Create a cache over an already-shared fetcher.
    pub fn with_fetcher(fetcher: Arc<F>) -> Self {
        Self {
            cache: FetchCache::new(OntologySource::new(fetcher)),
        }
    }

    /// Get an ontology by IRI, from the cache or from the source.
    pub async fn get_ontology(&self, ontology_iri: &str) -> CacheResult<Ontology> {
        self.cache.get(ontology_iri).await
    }

    /// Drop the cached ontology and fetch it anew.
    pub async fn reload_ontology(&self, ontology_iri: &str) -> CacheResult<Ontology> {
        self.cache.reload(ontology_iri).await
    }

    /// Counter snapshot.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
