//! Helix Document Collection
//!
//! Collection management for document storage.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::query::{Filter, Query, QueryResult};
use crate::types::{Document, DocumentId};
use parking_lot::RwLock;
use std::collections::HashMap;

// =============================================================================
// Collection
// =============================================================================

/// A collection of documents.
pub struct Collection {
    name: String,
    documents: RwLock<HashMap<DocumentId, Document>>,
}

impl Collection {
    /// Create a new collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Get the collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // -------------------------------------------------------------------------
    // Document Operations
    // -------------------------------------------------------------------------

    /// Insert a document.
    pub fn insert(&self, doc: Document) -> Result<DocumentId, CollectionError> {
        let id = doc.id.clone();
        let mut docs = self.documents.write();
        if docs.contains_key(&id) {
            return Err(CollectionError::DuplicateId(id));
        }
        docs.insert(id.clone(), doc);
        Ok(id)
    }

    /// Insert multiple documents.
    pub fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<DocumentId>, CollectionError> {
        let mut ids = Vec::with_capacity(docs.len());

        for doc in docs {
            let id = self.insert(doc)?;
            ids.push(id);
        }

        Ok(ids)
    }

    /// Get a document by ID.
    pub fn get(&self, id: &DocumentId) -> Option<Document> {
        self.documents.read().get(id).cloned()
    }

    /// Delete a document.
    pub fn delete(&self, id: &DocumentId) -> Result<Document, CollectionError> {
        self.documents
            .write()
            .remove(id)
            .ok_or_else(|| CollectionError::NotFound(id.clone()))
    }

    /// Check if a document exists.
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.read().contains_key(id)
    }

    /// Get the number of documents.
    pub fn count(&self) -> usize {
        self.documents.read().len()
    }

    /// Get all documents, in no particular order.
    pub fn all(&self) -> Vec<Document> {
        self.documents.read().values().cloned().collect()
    }

    // -------------------------------------------------------------------------
    // Query Operations
    // -------------------------------------------------------------------------

    /// Find documents matching a query: filter, sort, then skip and limit.
    ///
    /// Runs under a single read lock so the window is taken from one
    /// consistent view of the collection.
    pub fn find(&self, query: &Query) -> QueryResult {
        let docs = self.documents.read();
        let start = std::time::Instant::now();

        let mut matching: Vec<&Document> = docs.values().filter(|doc| query.matches(doc)).collect();
        if !query.sort.is_empty() {
            matching.sort_by(|a, b| query.compare(a, b));
        }

        let documents = matching
            .into_iter()
            .skip(query.skip.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        QueryResult {
            documents,
            total_scanned: docs.len(),
            execution_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Count documents matching every filter.
    pub fn count_matching(&self, filters: &[Filter]) -> usize {
        self.documents
            .read()
            .values()
            .filter(|doc| filters.iter().all(|f| f.matches(doc)))
            .count()
    }
}

// =============================================================================
// Collection Error
// =============================================================================

/// Errors that can occur in collection operations.
#[derive(Debug, Clone)]
pub enum CollectionError {
    DuplicateId(DocumentId),
    NotFound(DocumentId),
}

impl std::fmt::Display for CollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "Document with ID {} already exists", id),
            Self::NotFound(id) => write!(f, "Document with ID {} not found", id),
        }
    }
}

impl std::error::Error for CollectionError {}

// =============================================================================
// Tests
// =============================================================================
