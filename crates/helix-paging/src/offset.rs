//! Helix Offset Paginator
//!
//! Page-number pagination: an exact count of the filtered set followed by
//! a skip/limit scan. The count and the scan are separate store calls and
//! may observe different snapshots; rows inserted or deleted ahead of the
//! current offset between two requests can be skipped or repeated.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::envelope::{OffsetMeta, Page, PageMeta};
use crate::error::Result;
use crate::sort::SortSpec;
use helix_document::{DocumentStore, Filter, Query};

/// Runs offset-mode page queries against one collection.
pub struct OffsetPaginator<'a> {
    store: &'a dyn DocumentStore,
    collection: &'a str,
}

impl<'a> OffsetPaginator<'a> {
    pub fn new(store: &'a dyn DocumentStore, collection: &'a str) -> Self {
        Self { store, collection }
    }

    /// Fetch page `number` (1-based) of `size` documents.
    ///
    /// A page past the end is empty but still reports the true totals.
    pub async fn fetch(
        &self,
        filters: Vec<Filter>,
        sort: &SortSpec,
        number: usize,
        size: usize,
    ) -> Result<Page> {
        let total_records = self.store.count(self.collection, &filters).await?;
        let meta = OffsetMeta::new(number, size, total_records);

        let skip = number.saturating_sub(1).saturating_mul(size);
        let documents = if skip >= total_records {
            Vec::new()
        } else {
            let query = Query {
                filters,
                sort: sort.to_sorts(),
                skip: Some(skip),
                limit: Some(size),
            };
            self.store.scan(self.collection, &query).await?
        };

        Ok(Page {
            documents,
            meta: PageMeta::Offset(meta),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ResourceSchema;
    use crate::sort::resolve_sort;
    use helix_document::{Document, DocumentEngine};

    fn engine_with(count: usize) -> DocumentEngine {
        let engine = DocumentEngine::new();
        engine.create_collection("subjects").unwrap();
        for i in 0..count {
            let mut doc = Document::with_id_at(format!("s-{:04}", i), i as i64);
            doc.set("sex", if i % 2 == 0 { "MALE" } else { "FEMALE" });
            engine.insert("subjects", doc).unwrap();
        }
        engine
    }

    fn sort() -> SortSpec {
        resolve_sort(&ResourceSchema::subjects(), None).unwrap()
    }

    fn meta(page: &Page) -> &OffsetMeta {
        match &page.meta {
            PageMeta::Offset(meta) => meta,
            other => panic!("expected offset meta, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_page_arithmetic() {
        let engine = engine_with(864);
        let paginator = OffsetPaginator::new(&engine, "subjects");

        let last = paginator.fetch(Vec::new(), &sort(), 44, 20).await.unwrap();
        assert_eq!(meta(&last).total_pages, 44);
        assert_eq!(meta(&last).total_records, 864);
        assert_eq!(last.documents.len(), 4);
        assert_eq!(last.documents[0].id.as_str(), "s-0860");

        let beyond = paginator.fetch(Vec::new(), &sort(), 45, 20).await.unwrap();
        assert!(beyond.documents.is_empty());
        assert_eq!(meta(&beyond), &OffsetMeta::new(45, 20, 864));
    }

    #[tokio::test]
    async fn test_filtered_count() {
        let engine = engine_with(10);
        let paginator = OffsetPaginator::new(&engine, "subjects");

        let page = paginator
            .fetch(vec![Filter::eq("sex", "MALE")], &sort(), 1, 3)
            .await
            .unwrap();
        assert_eq!(meta(&page).total_records, 5);
        assert_eq!(meta(&page).total_pages, 2);
        let ids: Vec<&str> = page.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["s-0000", "s-0002", "s-0004"]);
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let engine = engine_with(0);
        let page = OffsetPaginator::new(&engine, "subjects")
            .fetch(Vec::new(), &sort(), 1, 20)
            .await
            .unwrap();
        assert!(page.documents.is_empty());
        assert_eq!(meta(&page).total_pages, 0);
    }

    #[tokio::test]
    async fn test_missing_collection_is_a_store_error() {
        let engine = DocumentEngine::new();
        let err = OffsetPaginator::new(&engine, "nope")
            .fetch(Vec::new(), &sort(), 1, 20)
            .await
            .unwrap_err();
        assert!(!err.is_user_error());
    }
}
