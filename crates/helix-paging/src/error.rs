//! Helix Paging Errors
//!
//! Every validation failure is raised before the store is touched; only
//! `Store` can originate from a running query.
//!
//! @version 0.1.0
//! @author Helix Development Team

use helix_document::StoreError;
use thiserror::Error;

/// Errors raised while planning or executing a paged query.
#[derive(Error, Debug)]
pub enum PagingError {
    #[error("unknown filter field '{field}'; allowed fields: {}", allowed.join(", "))]
    InvalidFilterField { field: String, allowed: Vec<String> },

    #[error("invalid value '{value}' for filter '{field}'; expected {expected}")]
    InvalidFilterValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("unknown sort field '{field}'; allowed fields: {}", allowed.join(", "))]
    InvalidSortField { field: String, allowed: Vec<String> },

    #[error("invalid or expired page cursor")]
    InvalidCursor,

    #[error("invalid page number '{0}'; expected an integer >= 1")]
    InvalidPageNumber(String),

    #[error("invalid page size '{0}'; expected a non-negative integer")]
    InvalidPageSize(String),

    #[error("page[after] and page[before] cannot be combined")]
    ConflictingCursors,

    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for paging operations.
pub type Result<T> = std::result::Result<T, PagingError>;

impl PagingError {
    /// Returns true if the caller sent something invalid.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, PagingError::Store(_))
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            PagingError::InvalidFilterField { .. } => "INVALID_FILTER_FIELD",
            PagingError::InvalidFilterValue { .. } => "INVALID_FILTER_VALUE",
            PagingError::InvalidSortField { .. } => "INVALID_SORT_FIELD",
            PagingError::InvalidCursor => "INVALID_CURSOR",
            PagingError::InvalidPageNumber(_) => "INVALID_PAGE_NUMBER",
            PagingError::InvalidPageSize(_) => "INVALID_PAGE_SIZE",
            PagingError::ConflictingCursors => "CONFLICTING_CURSORS",
            PagingError::UnknownResource(_) => "NOT_FOUND",
            PagingError::Store(_) => "INTERNAL_ERROR",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
