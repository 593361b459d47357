//! Helix Page Parameters
//!
//! Parses raw query pairs into a canonical [`PageParams`]. Deprecated
//! `skip`, `limit` and bare filter parameters are translated here into
//! their canonical forms, so the rest of the pipeline only ever sees one
//! representation. Each translation is recorded as a [`Deprecation`].
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::error::{PagingError, Result};
use crate::schema::ResourceSchema;
use helix_common::PagingConfig;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const PAGE_NUMBER: &str = "page[number]";
pub const PAGE_SIZE: &str = "page[size]";
pub const PAGE_AFTER: &str = "page[after]";
pub const PAGE_BEFORE: &str = "page[before]";
pub const SORT: &str = "sort";

const LEGACY_SKIP: &str = "skip";
const LEGACY_LIMIT: &str = "limit";

// =============================================================================
// Page Request
// =============================================================================

/// Where a cursor-mode page is anchored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorPosition {
    /// First page of the set.
    Start,
    /// Page following the anchor token.
    After(String),
    /// Page preceding the anchor token.
    Before(String),
    /// Last page of the set.
    End,
}

/// The page a caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    Offset { number: usize, size: usize },
    Cursor { size: usize, position: CursorPosition },
}

impl PageRequest {
    pub fn size(&self) -> usize {
        match self {
            PageRequest::Offset { size, .. } | PageRequest::Cursor { size, .. } => *size,
        }
    }

    pub fn is_cursor(&self) -> bool {
        matches!(self, PageRequest::Cursor { .. })
    }
}

// =============================================================================
// Deprecation
// =============================================================================

/// A deprecated parameter that was accepted and translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deprecation {
    pub parameter: String,
    pub replacement: String,
    pub note: Option<String>,
}

impl Deprecation {
    fn new(parameter: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            replacement: replacement.into(),
            note: None,
        }
    }

    fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Human-readable warning text.
    pub fn message(&self) -> String {
        let mut message = format!(
            "query parameter '{}' is deprecated; use '{}' instead",
            self.parameter, self.replacement
        );
        if let Some(note) = &self.note {
            message.push_str(" (");
            message.push_str(note);
            message.push(')');
        }
        message
    }
}

// =============================================================================
// Page Params
// =============================================================================

/// Canonical parameters of one paged request.
#[derive(Debug, Clone, PartialEq)]
pub struct PageParams {
    /// Raw filter values keyed by field name, not yet validated.
    pub filters: BTreeMap<String, String>,
    pub sort: Option<String>,
    pub page: PageRequest,
    pub deprecations: Vec<Deprecation>,
}

impl PageParams {
    pub fn is_legacy(&self) -> bool {
        !self.deprecations.is_empty()
    }
}

#[derive(Default)]
struct RawParams {
    number: Option<String>,
    size: Option<String>,
    after: Option<String>,
    before: Option<String>,
    sort: Option<String>,
    filters: BTreeMap<String, String>,
    skip: Option<String>,
    limit: Option<String>,
    bare_filters: BTreeMap<String, String>,
}

/// Parse raw query pairs into canonical page parameters.
///
/// Later occurrences of a repeated key replace earlier ones.
pub fn parse_params(
    pairs: &[(String, String)],
    schema: &ResourceSchema,
    config: &PagingConfig,
) -> Result<PageParams> {
    let raw = collect(pairs, schema);
    let mut deprecations = Vec::new();

    let mut filters = raw.filters;
    for (name, value) in raw.bare_filters {
        if filters.contains_key(&name) {
            continue;
        }
        deprecations.push(Deprecation::new(name.clone(), format!("filter[{}]", name)));
        filters.insert(name, value);
    }

    let size_raw = match (raw.size, raw.limit) {
        (Some(size), _) => Some(size),
        (None, Some(limit)) => {
            deprecations.push(Deprecation::new(LEGACY_LIMIT, PAGE_SIZE));
            Some(limit)
        }
        (None, None) => None,
    };
    let size = match size_raw {
        Some(raw) => parse_size(&raw, config.max_page_size)?,
        None => config.default_page_size,
    };

    // Validated in both modes; a well-formed number is unused in cursor mode.
    let number = raw.number.as_deref().map(parse_number).transpose()?;

    let page = match (raw.after, raw.before) {
        (Some(_), Some(_)) => return Err(PagingError::ConflictingCursors),
        (Some(after), None) => PageRequest::Cursor {
            size,
            position: if after.is_empty() {
                CursorPosition::Start
            } else {
                CursorPosition::After(after)
            },
        },
        (None, Some(before)) => PageRequest::Cursor {
            size,
            position: if before.is_empty() {
                CursorPosition::End
            } else {
                CursorPosition::Before(before)
            },
        },
        (None, None) => {
            let number = match (number, raw.skip) {
                (Some(number), _) => number,
                (None, Some(skip)) => {
                    let skip: usize = skip
                        .trim()
                        .parse()
                        .map_err(|_| PagingError::InvalidPageNumber(skip.clone()))?;
                    let mut deprecation = Deprecation::new(LEGACY_SKIP, PAGE_NUMBER);
                    if skip % size != 0 {
                        deprecation = deprecation
                            .with_note("skip is rounded down to the start of its page");
                    }
                    deprecations.push(deprecation);
                    skip / size + 1
                }
                (None, None) => 1,
            };
            PageRequest::Offset { number, size }
        }
    };

    for deprecation in &deprecations {
        warn!(
            parameter = %deprecation.parameter,
            replacement = %deprecation.replacement,
            "deprecated query parameter used"
        );
    }

    Ok(PageParams {
        filters,
        sort: raw.sort,
        page,
        deprecations,
    })
}

fn collect(pairs: &[(String, String)], schema: &ResourceSchema) -> RawParams {
    let mut raw = RawParams::default();

    for (key, value) in pairs {
        let value = value.clone();
        match key.as_str() {
            PAGE_NUMBER => raw.number = Some(value),
            PAGE_SIZE => raw.size = Some(value),
            PAGE_AFTER => raw.after = Some(value),
            PAGE_BEFORE => raw.before = Some(value),
            SORT => raw.sort = Some(value),
            LEGACY_SKIP => raw.skip = Some(value),
            LEGACY_LIMIT => raw.limit = Some(value),
            other => {
                if let Some(name) = filter_name(other) {
                    raw.filters.insert(name.to_string(), value);
                } else if schema.filter_field(other).is_some() {
                    raw.bare_filters.insert(other.to_string(), value);
                } else {
                    debug!(parameter = %other, "ignoring unknown query parameter");
                }
            }
        }
    }

    raw
}

fn filter_name(key: &str) -> Option<&str> {
    key.strip_prefix("filter[")?.strip_suffix(']')
}

fn parse_number(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(PagingError::InvalidPageNumber(raw.to_string())),
    }
}

fn parse_size(raw: &str, max: usize) -> Result<usize> {
    let size: usize = raw
        .trim()
        .parse()
        .map_err(|_| PagingError::InvalidPageSize(raw.to_string()))?;
    Ok(size.clamp(1, max.max(1)))
}

// =============================================================================
// Tests
// =============================================================================
