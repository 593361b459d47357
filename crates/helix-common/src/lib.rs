//! Helix Common - Shared Types and Utilities
//!
//! Foundational error and configuration types used across the Helix cohort
//! browser components. Keeps the document store, the paging core and the
//! HTTP server in agreement about limits and failure classification.
//!
//! Key Features:
//! - Unified error type with retryable / user error classification
//! - Paging limits (default and maximum page size, cursor bounds)
//! - Store pool sizing and acquisition timeouts
//!
//! @version 0.1.0
//! @author Helix Development Team

pub mod config;
pub mod error;

pub use config::{PagingConfig, StoreConfig};
pub use error::{HelixError, Result};
