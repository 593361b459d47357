//! Helix Error - Unified Error Types
//!
//! Error handling shared by every Helix crate that does not own a more
//! specific taxonomy. Categorizes failures by domain (configuration, storage,
//! resources) and exposes helpers for retryability and user/system
//! classification.
//!
//! @version 0.1.0
//! @author Helix Development Team

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Unified error type for Helix infrastructure operations.
#[derive(Error, Debug)]
pub enum HelixError {
    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Storage errors
    #[error("storage error: {0}")]
    Storage(String),

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    // Resource errors
    #[error("store pool exhausted")]
    PoolExhausted,

    #[error("timeout: {0}")]
    Timeout(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("serialization error: {0}")]
    Serialization(String),

    // Internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Type Aliases
// =============================================================================

/// Result type alias for Helix operations.
pub type Result<T> = std::result::Result<T, HelixError>;

// =============================================================================
// Error Classification
// =============================================================================

impl HelixError {
    /// Returns true if the operation can be safely retried by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, HelixError::PoolExhausted | HelixError::Timeout(_))
    }

    /// Returns true if this is a user error (vs system error).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            HelixError::Configuration(_) | HelixError::CollectionNotFound(_)
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
