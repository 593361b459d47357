//! Helix Document Store Interface
//!
//! The read-side contract between a document store and the paging core:
//! a filtered, sorted, windowed scan and a filtered count. Filters may
//! include composite conditions over sort-key attributes.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::engine::{DocumentEngine, StoreError};
use crate::query::{Filter, Query};
use crate::types::Document;
use async_trait::async_trait;

/// Read access to a queryable document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a filtered, sorted, windowed scan.
    async fn scan(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Count documents matching every filter.
    async fn count(&self, collection: &str, filters: &[Filter]) -> Result<usize, StoreError>;
}

#[async_trait]
impl DocumentStore for DocumentEngine {
    async fn scan(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.find(collection, query).map(|result| result.documents)
    }

    async fn count(&self, collection: &str, filters: &[Filter]) -> Result<usize, StoreError> {
        DocumentEngine::count(self, collection, filters)
    }
}

// =============================================================================
// Tests
// =============================================================================
