//! Helix Paging Engine
//!
//! The per-request pipeline: parse parameters, validate filters, resolve
//! the sort, decode the cursor, then run the offset or cursor paginator
//! and assemble the envelope. Planning does all validation, so a rejected
//! request never reaches the store.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::cursor::CursorCodec;
use crate::envelope::Envelope;
use crate::error::{PagingError, Result};
use crate::filter::{validate_filters, FilterSpec};
use crate::keyset::{CursorPaginator, Seek};
use crate::links::LinkBuilder;
use crate::offset::OffsetPaginator;
use crate::params::{parse_params, CursorPosition, Deprecation, PageRequest};
use crate::schema::SchemaCatalog;
use crate::sort::{resolve_sort, SortSpec};
use helix_common::PagingConfig;
use helix_document::DocumentStore;
use std::time::Instant;
use tracing::{debug, error};

// =============================================================================
// Query Plan
// =============================================================================

/// How the store is windowed for a validated request.
#[derive(Debug, Clone, PartialEq)]
pub enum Window {
    Offset { number: usize, size: usize },
    Cursor { size: usize, seek: Seek },
}

/// A fully validated request, ready to run.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub collection: String,
    pub filters: FilterSpec,
    pub sort: SortSpec,
    pub request: PageRequest,
    pub window: Window,
    pub deprecations: Vec<Deprecation>,
}

// =============================================================================
// Paging Engine
// =============================================================================

/// Stateless paged-query engine shared by every request.
#[derive(Debug, Clone)]
pub struct PagingEngine {
    config: PagingConfig,
    catalog: SchemaCatalog,
    codec: CursorCodec,
}

impl PagingEngine {
    /// Create an engine serving the built-in resources.
    pub fn new(config: PagingConfig) -> helix_common::Result<Self> {
        config.validate()?;
        let codec = CursorCodec::new(&config)?;
        Ok(Self {
            config,
            catalog: SchemaCatalog::builtin(),
            codec,
        })
    }

    /// Replace the resource catalog.
    pub fn with_catalog(mut self, catalog: SchemaCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn codec(&self) -> &CursorCodec {
        &self.codec
    }

    /// Validate a request without touching the store.
    pub fn plan(&self, collection: &str, pairs: &[(String, String)]) -> Result<QueryPlan> {
        let schema = self
            .catalog
            .get(collection)
            .ok_or_else(|| PagingError::UnknownResource(collection.to_string()))?;

        let params = parse_params(pairs, schema, &self.config)?;
        let filters = validate_filters(schema, &params.filters)?;
        let sort = resolve_sort(schema, params.sort.as_deref())?;

        let window = match &params.page {
            PageRequest::Offset { number, size } => Window::Offset {
                number: *number,
                size: *size,
            },
            PageRequest::Cursor { size, position } => {
                let seek = match position {
                    CursorPosition::Start => Seek::Start,
                    CursorPosition::After(token) => Seek::After(self.codec.decode(token, &sort)?),
                    CursorPosition::Before(token) => {
                        Seek::Before(self.codec.decode(token, &sort)?)
                    }
                    CursorPosition::End => Seek::End,
                };
                Window::Cursor { size: *size, seek }
            }
        };

        debug!(
            collection,
            filters = filters.len(),
            sort = ?sort.field_names(),
            window = ?window,
            "planned paged query"
        );

        Ok(QueryPlan {
            collection: collection.to_string(),
            filters,
            sort,
            request: params.page,
            window,
            deprecations: params.deprecations,
        })
    }

    /// Run a plan and assemble its envelope. Links are rooted at `base_path`.
    pub async fn execute(
        &self,
        store: &dyn DocumentStore,
        plan: QueryPlan,
        base_path: &str,
    ) -> Result<Envelope> {
        let start = Instant::now();
        let filters = plan.filters.to_filters();

        let result = match &plan.window {
            Window::Offset { number, size } => {
                OffsetPaginator::new(store, &plan.collection)
                    .fetch(filters, &plan.sort, *number, *size)
                    .await
            }
            Window::Cursor { size, seek } => {
                CursorPaginator::new(store, &plan.collection, &self.codec)
                    .fetch(filters, &plan.sort, *size, seek)
                    .await
            }
        };

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                error!(collection = %plan.collection, error = %err, "paged query failed");
                return Err(err);
            }
        };

        debug!(
            collection = %plan.collection,
            returned = page.documents.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "executed paged query"
        );

        let links = LinkBuilder::new(base_path, &plan.filters, &plan.sort)
            .build(&plan.request, &page.meta);
        Ok(Envelope::assemble(page, links, plan.deprecations))
    }

    /// Plan and execute in one step.
    pub async fn query(
        &self,
        store: &dyn DocumentStore,
        collection: &str,
        pairs: &[(String, String)],
        base_path: &str,
    ) -> Result<Envelope> {
        let plan = self.plan(collection, pairs)?;
        self.execute(store, plan, base_path).await
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use helix_document::{Document, DocumentEngine, Filter, Query, StoreError};

    fn pairs(query: &[(&str, &str)]) -> Vec<(String, String)> {
        query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn engine() -> PagingEngine {
        PagingEngine::new(PagingConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PagingConfig::default().with_max_page_size(0);
        assert!(PagingEngine::new(config).is_err());
    }

    #[test]
    fn test_plan_offset() {
        let plan = engine()
            .plan(
                "subjects",
                &pairs(&[("filter[sex]", "MALE"), ("page[number]", "2"), ("page[size]", "5")]),
            )
            .unwrap();

        assert_eq!(plan.window, Window::Offset { number: 2, size: 5 });
        assert_eq!(plan.filters.len(), 1);
        assert_eq!(plan.sort.field_names(), vec!["id"]);
    }

    #[test]
    fn test_plan_rejects_before_store() {
        let engine = engine();

        assert!(matches!(
            engine.plan("variants", &[]),
            Err(PagingError::UnknownResource(_))
        ));
        assert!(matches!(
            engine.plan("subjects", &pairs(&[("filter[sex]", "INVALID_VALUE")])),
            Err(PagingError::InvalidFilterValue { .. })
        ));
        assert!(matches!(
            engine.plan("subjects", &pairs(&[("sort", "password")])),
            Err(PagingError::InvalidSortField { .. })
        ));
        assert!(matches!(
            engine.plan("subjects", &pairs(&[("page[after]", "garbage!")])),
            Err(PagingError::InvalidCursor)
        ));
    }

    /// Store that fails every call and records whether it was reached.
    struct FailingStore {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl DocumentStore for FailingStore {
        async fn scan(&self, _: &str, _: &Query) -> std::result::Result<Vec<Document>, StoreError> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Err(StoreError::Unavailable("disk on fire".to_string()))
        }

        async fn count(&self, _: &str, _: &[Filter]) -> std::result::Result<usize, StoreError> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Err(StoreError::Unavailable("disk on fire".to_string()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_not_a_user_error() {
        let store = FailingStore {
            calls: Default::default(),
        };
        let err = engine()
            .query(&store, "subjects", &[], "/docs")
            .await
            .unwrap_err();

        assert!(!err.is_user_error());
        assert_eq!(store.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_never_reaches_store() {
        let store = FailingStore {
            calls: Default::default(),
        };
        let err = engine()
            .query(&store, "subjects", &pairs(&[("page[number]", "0")]), "/docs")
            .await
            .unwrap_err();

        assert!(err.is_user_error());
        assert_eq!(store.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_query_round_trip() {
        let store = DocumentEngine::new();
        store.create_collection("subjects").unwrap();
        for i in 0..3 {
            store
                .insert("subjects", Document::with_id_at(format!("s-{}", i), i))
                .unwrap();
        }

        let envelope = engine()
            .query(&store, "subjects", &pairs(&[("page[size]", "2")]), "/docs")
            .await
            .unwrap();

        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.links.next.as_deref(), Some("/docs?page[number]=2&page[size]=2"));
        assert!(!envelope.is_deprecated());
    }
}
