//! Helix Config - Configuration Structures
//!
//! Configuration types shared by the paging core and the server. Supports
//! TOML loading and programmatic construction, with defaults suitable for
//! development.
//!
//! Key Features:
//! - Paging limits (default / maximum page size, cursor token bounds)
//! - Cursor signing secret
//! - Store pool sizing and acquisition timeout
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::error::{HelixError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Secret used when none is configured. Tokens signed with it are only
/// tamper-evident against callers who have not read this source file.
pub const DEVELOPMENT_CURSOR_SECRET: &str = "helix-development-cursor-secret";

// =============================================================================
// Paging Configuration
// =============================================================================

/// Configuration for the pagination engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub max_cursor_len: usize,
    pub cursor_secret: String,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 100,
            max_page_size: 1000,
            max_cursor_len: 4096,
            cursor_secret: DEVELOPMENT_CURSOR_SECRET.to_string(),
        }
    }
}

impl PagingConfig {
    /// Set the cursor signing secret.
    pub fn with_cursor_secret(mut self, secret: impl Into<String>) -> Self {
        self.cursor_secret = secret.into();
        self
    }

    /// Set the maximum page size.
    pub fn with_max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = max;
        self
    }

    /// Set the default page size.
    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    /// True when the built-in development secret is still in use.
    pub fn uses_development_secret(&self) -> bool {
        self.cursor_secret == DEVELOPMENT_CURSOR_SECRET
    }

    /// Check the limits are coherent.
    pub fn validate(&self) -> Result<()> {
        if self.max_page_size == 0 {
            return Err(HelixError::Configuration(
                "max_page_size must be at least 1".to_string(),
            ));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(HelixError::Configuration(format!(
                "default_page_size must be within 1..={}",
                self.max_page_size
            )));
        }
        if self.cursor_secret.is_empty() {
            return Err(HelixError::Configuration(
                "cursor_secret must not be empty".to_string(),
            ));
        }
        if self.max_cursor_len < 64 {
            return Err(HelixError::Configuration(
                "max_cursor_len must be at least 64".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Store Configuration
// =============================================================================

/// Configuration for access to the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of requests holding a store lease at once.
    pub pool_size: usize,
    pub acquire_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pool_size: 32,
            acquire_timeout_ms: 5_000,
        }
    }
}

impl StoreConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(HelixError::Configuration(
                "store pool_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Load any deserializable configuration section from a TOML file.
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| HelixError::Configuration(e.to_string()))
}

// =============================================================================
// Tests
// =============================================================================
