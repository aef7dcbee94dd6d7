//! Quarry Core - Entity Models and Errors
//!
//! Pure data types shared by every quarry crate: the entities served by
//! the remote knowledge API and the error taxonomy for fetching and
//! caching them. No I/O and no caching logic live here.

pub mod entities;
pub mod error;

pub use entities::{ItemKey, ListNode, Ontology};
pub use error::{CacheError, CacheResult, SourceError, SourceResult};
