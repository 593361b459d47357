//! Helix Link Builder
//!
//! Navigation links are the current request re-serialized with only the
//! page descriptor changed. Keys are emitted in a fixed order: filters by
//! field name, then `sort`, then the page keys.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::envelope::{CursorMeta, Links, OffsetMeta, PageMeta};
use crate::filter::FilterSpec;
use crate::params::{CursorPosition, PageRequest, PAGE_AFTER, PAGE_BEFORE, PAGE_NUMBER, PAGE_SIZE, SORT};
use crate::sort::SortSpec;

/// Builds navigation links for one request.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_path: String,
    fixed: Vec<(String, String)>,
}

impl LinkBuilder {
    pub fn new(base_path: impl Into<String>, filters: &FilterSpec, sort: &SortSpec) -> Self {
        let mut fixed = filters.query_pairs();
        if let Some(requested) = sort.requested() {
            fixed.push((SORT.to_string(), requested.to_string()));
        }
        Self {
            base_path: base_path.into(),
            fixed,
        }
    }

    /// Links for a page produced from `request`.
    pub fn build(&self, request: &PageRequest, meta: &PageMeta) -> Links {
        match meta {
            PageMeta::Offset(meta) => self.offset_links(meta),
            PageMeta::Cursor(meta) => self.cursor_links(request, meta),
        }
    }

    fn offset_links(&self, meta: &OffsetMeta) -> Links {
        let page = |number: usize| self.url(PAGE_NUMBER, &number.to_string(), meta.page_size);
        let n = meta.current_page;
        let last = meta.last_page();

        Links {
            self_link: page(n),
            first: page(1),
            prev: (n > 1).then(|| page((n - 1).min(last))),
            next: (n < meta.total_pages).then(|| page(n + 1)),
            last: Some(page(last)),
        }
    }

    fn cursor_links(&self, request: &PageRequest, meta: &CursorMeta) -> Links {
        let size = meta.page_size;
        let self_link = match request {
            PageRequest::Cursor { position, .. } => match position {
                CursorPosition::Start => self.url(PAGE_AFTER, "", size),
                CursorPosition::After(token) => self.url(PAGE_AFTER, token, size),
                CursorPosition::Before(token) => self.url(PAGE_BEFORE, token, size),
                CursorPosition::End => self.url(PAGE_BEFORE, "", size),
            },
            PageRequest::Offset { number, .. } => self.url(PAGE_NUMBER, &number.to_string(), size),
        };

        let prev = match (&meta.start_cursor, meta.has_previous_page) {
            (Some(start), true) => Some(self.url(PAGE_BEFORE, start, size)),
            _ => None,
        };
        let next = match (&meta.end_cursor, meta.has_next_page) {
            (Some(end), true) => Some(self.url(PAGE_AFTER, end, size)),
            _ => None,
        };

        Links {
            self_link,
            first: self.url(PAGE_AFTER, "", size),
            prev,
            next,
            last: None,
        }
    }

    fn url(&self, page_key: &str, page_value: &str, size: usize) -> String {
        let mut query: Vec<String> = self
            .fixed
            .iter()
            .map(|(k, v)| format!("{}={}", k, encode_component(v)))
            .collect();
        query.push(format!("{}={}", page_key, encode_component(page_value)));
        query.push(format!("{}={}", PAGE_SIZE, size));

        format!("{}?{}", self.base_path, query.join("&"))
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set, keeping
/// the `,` separator of sort lists readable.
fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b',' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
