//! Error types for quarry operations

use crate::ItemKey;
use thiserror::Error;

/// Failures raised by the transport/parsing collaborators while producing
/// a batch of items.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("Resource not found: {key}")]
    NotFound { key: ItemKey },

    #[error("Request for {key} failed: {reason}")]
    RequestFailed { key: ItemKey, reason: String },

    #[error("Response for {key} could not be decoded: {reason}")]
    MalformedResponse { key: ItemKey, reason: String },
}

/// Failures observed by a cache consumer awaiting an entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Source returned no items for {key}")]
    EmptyBatch { key: ItemKey },

    #[error("Source batch for {requested} led with {actual}")]
    KeyMismatch { requested: ItemKey, actual: ItemKey },

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Cache entry was dropped before its fetch settled")]
    Abandoned,
}

/// Result type alias for collaborator fetches.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

// =============================================================================
// TESTS
// =============================================================================
