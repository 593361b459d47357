//! Helix Cursor Paginator
//!
//! Keyset pagination relative to an anchor's sort-key values. The window
//! is selected by a composite predicate rather than a row offset, so pages
//! stay stable while rows outside the visited key range come and go.
//!
//! For sort keys `k1..kn` and anchor values `a1..an`, "after" is
//!
//! ```text
//! (k1 > a1) OR (k1 = a1 AND k2 > a2) OR ... OR (k1 = a1 AND ... AND kn > an)
//! ```
//!
//! with `>` flipped to `<` for descending keys. "Before" flips every
//! comparison and scans in reversed order.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::cursor::{Anchor, CursorCodec};
use crate::envelope::{CursorMeta, Page, PageMeta};
use crate::error::Result;
use crate::sort::SortSpec;
use helix_document::{Document, DocumentStore, Filter, Query};

// =============================================================================
// Seek
// =============================================================================

/// A decoded cursor position.
#[derive(Debug, Clone, PartialEq)]
pub enum Seek {
    Start,
    After(Anchor),
    Before(Anchor),
    End,
}

/// Predicate selecting documents strictly after (`forward`) or strictly
/// before the anchor in sort order.
pub fn seek_predicate(anchor: &Anchor, sort: &SortSpec, forward: bool) -> Filter {
    let pairs: Vec<(&str, &helix_document::Value)> = sort
        .keys()
        .iter()
        .zip(anchor.values())
        .map(|(key, (_, value))| (key.attribute.as_str(), value))
        .collect();

    let branches = sort
        .keys()
        .iter()
        .enumerate()
        .take(pairs.len())
        .map(|(i, key)| {
            let mut terms: Vec<Filter> = pairs[..i]
                .iter()
                .map(|(attr, value)| Filter::eq(*attr, (*value).clone()))
                .collect();
            let (attr, value) = pairs[i];
            let value = value.clone();
            terms.push(if key.direction.is_ascending() == forward {
                Filter::gt(attr, value)
            } else {
                Filter::lt(attr, value)
            });
            Filter::And(terms)
        })
        .collect();

    Filter::Or(branches)
}

// =============================================================================
// Paginator
// =============================================================================

/// Runs cursor-mode page queries against one collection.
pub struct CursorPaginator<'a> {
    store: &'a dyn DocumentStore,
    collection: &'a str,
    codec: &'a CursorCodec,
}

impl<'a> CursorPaginator<'a> {
    pub fn new(store: &'a dyn DocumentStore, collection: &'a str, codec: &'a CursorCodec) -> Self {
        Self {
            store,
            collection,
            codec,
        }
    }

    /// Fetch up to `size` documents from `seek`, in forward sort order.
    pub async fn fetch(
        &self,
        filters: Vec<Filter>,
        sort: &SortSpec,
        size: usize,
        seek: &Seek,
    ) -> Result<Page> {
        let (documents, has_previous_page, has_next_page) = match seek {
            Seek::Start => {
                let (docs, more) = self.window(&filters, sort, None, true, size).await?;
                (docs, false, more)
            }
            Seek::After(anchor) => {
                let (docs, more) = self.window(&filters, sort, Some(anchor), true, size).await?;
                let earlier = self
                    .exists(&filters, Filter::negate(seek_predicate(anchor, sort, true)))
                    .await?;
                (docs, earlier, more)
            }
            Seek::Before(anchor) => {
                let (docs, more) = self.window(&filters, sort, Some(anchor), false, size).await?;
                let later = self
                    .exists(&filters, Filter::negate(seek_predicate(anchor, sort, false)))
                    .await?;
                (docs, more, later)
            }
            Seek::End => {
                let (docs, more) = self.window(&filters, sort, None, false, size).await?;
                (docs, more, false)
            }
        };

        let meta = CursorMeta {
            page_size: size,
            has_next_page,
            has_previous_page,
            start_cursor: documents.first().map(|d| self.codec.encode_document(d, sort)),
            end_cursor: documents.last().map(|d| self.codec.encode_document(d, sort)),
        };

        Ok(Page {
            documents,
            meta: PageMeta::Cursor(meta),
        })
    }

    /// Scan one window of `size + 1` rows; the extra row only signals that
    /// more rows exist in the scan direction. Backward windows are scanned
    /// in reversed order and flipped back before returning.
    async fn window(
        &self,
        filters: &[Filter],
        sort: &SortSpec,
        anchor: Option<&Anchor>,
        forward: bool,
        size: usize,
    ) -> Result<(Vec<Document>, bool)> {
        let mut query = Query {
            filters: filters.to_vec(),
            sort: if forward {
                sort.to_sorts()
            } else {
                sort.to_reversed_sorts()
            },
            skip: None,
            limit: Some(size.saturating_add(1)),
        };
        if let Some(anchor) = anchor {
            query.filters.push(seek_predicate(anchor, sort, forward));
        }

        let mut documents = self.store.scan(self.collection, &query).await?;
        let more = documents.len() > size;
        documents.truncate(size);
        if !forward {
            documents.reverse();
        }
        Ok((documents, more))
    }

    async fn exists(&self, filters: &[Filter], condition: Filter) -> Result<bool> {
        let mut query = Query::new().with_limit(1);
        query.filters = filters.to_vec();
        query.filters.push(condition);
        Ok(!self.store.scan(self.collection, &query).await?.is_empty())
    }
}

// =============================================================================
// Tests
// =============================================================================
