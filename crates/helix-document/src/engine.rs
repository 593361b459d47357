//! Helix Document Engine
//!
//! Core engine that coordinates all document store operations.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::collection::{Collection, CollectionError};
use crate::query::{Filter, Query, QueryResult};
use crate::types::{Document, DocumentId};
use parking_lot::RwLock;
use std::collections::HashMap;

// =============================================================================
// Document Engine Configuration
// =============================================================================

/// Configuration for the document engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_collections: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_collections: 1000,
        }
    }
}

// =============================================================================
// Document Engine
// =============================================================================

/// The main document storage and query engine.
pub struct DocumentEngine {
    config: EngineConfig,
    collections: RwLock<HashMap<String, Collection>>,
    stats: RwLock<EngineStats>,
}

impl DocumentEngine {
    /// Create a new document engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a new document engine with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            collections: RwLock::new(HashMap::new()),
            stats: RwLock::new(EngineStats::default()),
        }
    }

    // -------------------------------------------------------------------------
    // Collection Management
    // -------------------------------------------------------------------------

    /// Create a new collection.
    pub fn create_collection(&self, name: impl Into<String>) -> Result<(), StoreError> {
        let name = name.into();
        let mut collections = self.collections.write();

        if collections.len() >= self.config.max_collections {
            return Err(StoreError::TooManyCollections);
        }

        if collections.contains_key(&name) {
            return Err(StoreError::CollectionExists(name));
        }

        collections.insert(name.clone(), Collection::new(name));
        Ok(())
    }

    /// Drop a collection.
    pub fn drop_collection(&self, name: &str) -> Result<(), StoreError> {
        self.collections
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))
    }

    /// List all collection names, sorted.
    pub fn list_collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a collection exists.
    pub fn collection_exists(&self, name: &str) -> bool {
        self.collections.read().contains_key(name)
    }

    /// Get collection statistics.
    pub fn collection_stats(&self, name: &str) -> Option<CollectionStats> {
        self.collections.read().get(name).map(|c| CollectionStats {
            name: name.to_string(),
            document_count: c.count(),
        })
    }

    fn with_collection<T>(
        &self,
        collection: &str,
        f: impl FnOnce(&Collection) -> T,
    ) -> Result<T, StoreError> {
        let collections = self.collections.read();
        let coll = collections
            .get(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;
        Ok(f(coll))
    }

    // -------------------------------------------------------------------------
    // Document Operations
    // -------------------------------------------------------------------------

    /// Insert a document into a collection.
    pub fn insert(&self, collection: &str, doc: Document) -> Result<DocumentId, StoreError> {
        let id = self
            .with_collection(collection, |c| c.insert(doc))?
            .map_err(StoreError::Collection)?;
        self.stats.write().documents_inserted += 1;
        Ok(id)
    }

    /// Insert multiple documents.
    pub fn insert_many(
        &self,
        collection: &str,
        docs: Vec<Document>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        let ids = self
            .with_collection(collection, |c| c.insert_many(docs))?
            .map_err(StoreError::Collection)?;
        self.stats.write().documents_inserted += ids.len() as u64;
        Ok(ids)
    }

    /// Get a document by ID.
    pub fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        self.with_collection(collection, |c| c.get(id))
    }

    /// Delete a document.
    pub fn delete(&self, collection: &str, id: &DocumentId) -> Result<Document, StoreError> {
        let doc = self
            .with_collection(collection, |c| c.delete(id))?
            .map_err(StoreError::Collection)?;
        self.stats.write().documents_deleted += 1;
        Ok(doc)
    }

    // -------------------------------------------------------------------------
    // Query Operations
    // -------------------------------------------------------------------------

    /// Find documents matching a query.
    pub fn find(&self, collection: &str, query: &Query) -> Result<QueryResult, StoreError> {
        let result = self.with_collection(collection, |c| c.find(query))?;
        self.stats.write().queries_executed += 1;
        Ok(result)
    }

    /// Count documents matching every filter.
    pub fn count(&self, collection: &str, filters: &[Filter]) -> Result<usize, StoreError> {
        let count = self.with_collection(collection, |c| c.count_matching(filters))?;
        self.stats.write().counts_executed += 1;
        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Statistics
    // -------------------------------------------------------------------------

    /// Get engine statistics.
    pub fn stats(&self) -> EngineStats {
        self.stats.read().clone()
    }

    /// Reset statistics.
    pub fn reset_stats(&self) {
        *self.stats.write() = EngineStats::default();
    }
}

impl Default for DocumentEngine {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Engine Statistics
// =============================================================================

/// Statistics for the document engine.
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    pub documents_inserted: u64,
    pub documents_deleted: u64,
    pub queries_executed: u64,
    pub counts_executed: u64,
}

/// Statistics for a collection.
#[derive(Debug, Clone)]
pub struct CollectionStats {
    pub name: String,
    pub document_count: usize,
}

// =============================================================================
// Store Error
// =============================================================================

/// Errors that can occur in the document store.
#[derive(Debug, Clone)]
pub enum StoreError {
    CollectionExists(String),
    CollectionNotFound(String),
    TooManyCollections,
    Collection(CollectionError),
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CollectionExists(name) => write!(f, "Collection already exists: {}", name),
            Self::CollectionNotFound(name) => write!(f, "Collection not found: {}", name),
            Self::TooManyCollections => write!(f, "Maximum number of collections reached"),
            Self::Collection(err) => write!(f, "Collection error: {}", err),
            Self::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

// =============================================================================
// Tests
// =============================================================================
