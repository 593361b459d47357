//! Helix Response Envelope
//!
//! The `{ data, meta: { page }, links }` payload returned by every paged
//! request, in either pagination mode.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::params::Deprecation;
use helix_document::Document;
use serde::Serialize;
use serde_json::Value as JsonValue;

// =============================================================================
// Page Metadata
// =============================================================================

/// Offset-mode metadata. Totals are exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetMeta {
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_records: usize,
}

impl OffsetMeta {
    pub fn new(current_page: usize, page_size: usize, total_records: usize) -> Self {
        Self {
            current_page,
            page_size,
            total_pages: total_records.div_ceil(page_size.max(1)),
            total_records,
        }
    }

    /// Page number of the `last` link; 1 for an empty set.
    pub fn last_page(&self) -> usize {
        self.total_pages.max(1)
    }
}

/// Cursor-mode metadata. Nothing is counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorMeta {
    pub page_size: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageMeta {
    Offset(OffsetMeta),
    Cursor(CursorMeta),
}

/// One page of documents with its metadata.
#[derive(Debug, Clone)]
pub struct Page {
    pub documents: Vec<Document>,
    pub meta: PageMeta,
}

// =============================================================================
// Links
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
    pub first: String,
    pub prev: Option<String>,
    pub next: Option<String>,
    /// Offset mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

// =============================================================================
// Envelope
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub page: PageMeta,
}

/// The response payload.
///
/// `deprecations` is never serialized; the HTTP layer turns it into
/// response headers.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub data: Vec<JsonValue>,
    pub meta: Meta,
    pub links: Links,
    #[serde(skip)]
    pub deprecations: Vec<Deprecation>,
}

impl Envelope {
    /// Assemble the envelope for a page.
    pub fn assemble(page: Page, links: Links, deprecations: Vec<Deprecation>) -> Self {
        Self {
            data: page.documents.iter().map(Document::to_json).collect(),
            meta: Meta { page: page.meta },
            links,
            deprecations,
        }
    }

    pub fn is_deprecated(&self) -> bool {
        !self.deprecations.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_offset_totals() {
        let meta = OffsetMeta::new(1, 20, 864);
        assert_eq!(meta.total_pages, 44);

        let empty = OffsetMeta::new(1, 20, 0);
        assert_eq!(empty.total_pages, 0);
        assert_eq!(empty.last_page(), 1);

        assert_eq!(OffsetMeta::new(1, 20, 40).total_pages, 2);
    }

    #[test]
    fn test_offset_meta_shape() {
        let value = serde_json::to_value(PageMeta::Offset(OffsetMeta::new(2, 20, 864))).unwrap();
        assert_eq!(
            value,
            json!({ "currentPage": 2, "pageSize": 20, "totalPages": 44, "totalRecords": 864 })
        );
    }

    #[test]
    fn test_envelope_shape() {
        let mut doc = Document::with_id_at("s-1", 0);
        doc.set("sex", "MALE");

        let page = Page {
            documents: vec![doc],
            meta: PageMeta::Cursor(CursorMeta {
                page_size: 1,
                has_next_page: false,
                has_previous_page: false,
                start_cursor: None,
                end_cursor: None,
            }),
        };
        let links = Links {
            self_link: "/x?page[after]=&page[size]=1".to_string(),
            first: "/x?page[after]=&page[size]=1".to_string(),
            prev: None,
            next: None,
            last: None,
        };
        let deprecation = Deprecation {
            parameter: "limit".to_string(),
            replacement: "page[size]".to_string(),
            note: None,
        };

        let envelope = Envelope::assemble(page, links, vec![deprecation]);
        assert!(envelope.is_deprecated());

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["data"][0]["id"], "s-1");
        assert_eq!(value["data"][0]["sex"], "MALE");
        assert_eq!(value["meta"]["page"]["hasNextPage"], false);
        assert!(value["meta"]["page"]["startCursor"].is_null());
        assert!(value["links"]["prev"].is_null());
        assert!(value["links"].get("last").is_none());
        assert_eq!(value["links"]["self"], "/x?page[after]=&page[size]=1");
        assert!(value.get("deprecations").is_none());
    }
}
