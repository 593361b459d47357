//! Helix Server State
//!
//! Application state shared across request handlers: the document engine,
//! the bounded store pool in front of it, and the paging engine.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::config::ServerConfig;
use crate::pool::StorePool;
use helix_common::HelixError;
use helix_document::{Document, DocumentEngine};
use helix_paging::PagingEngine;
use std::path::Path;
use std::sync::Arc;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub document_engine: Arc<DocumentEngine>,
    pub paging: Arc<PagingEngine>,
    pub pool: StorePool,
}

impl AppState {
    /// Create state over an empty document engine.
    pub fn new(config: ServerConfig) -> Result<Self, HelixError> {
        Self::with_engine(config, DocumentEngine::new())
    }

    /// Create state over an existing document engine.
    pub fn with_engine(config: ServerConfig, engine: DocumentEngine) -> Result<Self, HelixError> {
        config.validate()?;

        let document_engine = Arc::new(engine);
        let paging = Arc::new(PagingEngine::new(config.paging.clone())?);
        let pool = StorePool::new(Arc::clone(&document_engine), &config.store);

        Ok(Self {
            config: Arc::new(config),
            document_engine,
            paging,
            pool,
        })
    }

    /// Load every `<collection>.json` array in `dir` into the engine.
    ///
    /// Returns the number of documents loaded.
    pub fn load_data_dir(&self, dir: &Path) -> Result<usize, HelixError> {
        let mut total = 0;

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |e| e != "json") {
                continue;
            }
            let Some(collection) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = std::fs::read_to_string(&path)?;
            let docs: Vec<serde_json::Value> = serde_json::from_str(&content).map_err(|e| {
                HelixError::Serialization(format!("{}: {}", path.display(), e))
            })?;

            if !self.document_engine.collection_exists(collection) {
                self.document_engine
                    .create_collection(collection)
                    .map_err(|e| HelixError::Storage(e.to_string()))?;
            }

            let mut count = 0;
            for doc_json in docs {
                let doc = match Document::from_json(doc_json) {
                    Ok(doc) => doc,
                    Err(e) => {
                        tracing::warn!(collection, error = %e, "skipping document");
                        continue;
                    }
                };
                match self.document_engine.insert(collection, doc) {
                    Ok(_) => count += 1,
                    Err(e) => tracing::warn!(collection, error = %e, "skipping document"),
                }
            }

            tracing::info!("Loaded {} documents into collection '{}'", count, collection);
            total += count;
        }

        Ok(total)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use helix_document::DocumentId;

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ServerConfig::default();
        config.store.pool_size = 0;
        assert!(AppState::new(config).is_err());
    }

    #[test]
    fn test_load_data_dir() {
        let dir = std::env::temp_dir().join(format!("helix-data-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("subjects.json"),
            r#"[
                {"id": "s-1", "createdAt": "2024-01-01T00:00:00Z", "sex": "MALE"},
                {"id": "s-2", "createdAt": 1704067200000, "sex": "FEMALE"},
                {"id": "s-1", "createdAt": 1704067200000, "sex": "OTHER"},
                {"id": 17, "createdAt": "2024-03-01T00:00:00Z", "sex": "MALE"},
                {"id": "s-3", "sex": "OTHER"},
                {"id": "s-4", "createdAt": "not a date", "sex": "OTHER"},
                {"id": ["s-5"], "createdAt": 1704067200000},
                {"createdAt": 1704067200000, "sex": "OTHER"},
                42
            ]"#,
        )
        .unwrap();
        std::fs::write(dir.join("README.txt"), "not data").unwrap();

        let state = AppState::new(ServerConfig::default()).unwrap();
        let loaded = state.load_data_dir(&dir).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded, 3);
        assert_eq!(
            state.document_engine.collection_stats("subjects").unwrap().document_count,
            3
        );

        let numeric = state
            .document_engine
            .get("subjects", &DocumentId::new("17"))
            .unwrap()
            .unwrap();
        assert_eq!(numeric.created_at, 1_709_251_200_000);
        let first = state
            .document_engine
            .get("subjects", &DocumentId::new("s-1"))
            .unwrap()
            .unwrap();
        assert_eq!(first.created_at, 1_704_067_200_000);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = std::env::temp_dir().join(format!("helix-data-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("subjects.json"), "{not json").unwrap();

        let state = AppState::new(ServerConfig::default()).unwrap();
        let result = state.load_data_dir(&dir);
        std::fs::remove_dir_all(&dir).ok();

        assert!(matches!(result, Err(HelixError::Serialization(_))));
    }
}
