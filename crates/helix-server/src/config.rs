//! Helix Server Configuration
//!
//! Binding, timeouts, data loading and the paging and store sections.
//! Values come from defaults, an optional TOML file, environment
//! overrides and finally command-line flags, in that order.
//!
//! @version 0.1.0
//! @author Helix Development Team

use helix_common::config::load_toml;
use helix_common::{HelixError, PagingConfig, StoreConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the cursor signing secret.
pub const ENV_CURSOR_SECRET: &str = "HELIX_CURSOR_SECRET";

/// Environment variable overriding the maximum page size.
pub const ENV_MAX_PAGE_SIZE: &str = "HELIX_MAX_PAGE_SIZE";

// =============================================================================
// Server Configuration
// =============================================================================

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// Directory of `<collection>.json` files loaded at startup.
    pub data_dir: Option<String>,
    pub paging: PagingConfig,
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
            data_dir: None,
            paging: PagingConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new server config with the specified host and port.
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            ..Default::default()
        }
    }

    /// Load from a TOML file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, HelixError> {
        load_toml(path)
    }

    /// Apply `HELIX_*` environment overrides.
    pub fn with_env_overrides(self) -> Result<Self, HelixError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, HelixError> {
        if let Some(secret) = lookup(ENV_CURSOR_SECRET) {
            self.paging.cursor_secret = secret;
        }
        if let Some(max) = lookup(ENV_MAX_PAGE_SIZE) {
            self.paging.max_page_size = max.trim().parse().map_err(|_| {
                HelixError::Configuration(format!("{} must be an integer, got '{}'", ENV_MAX_PAGE_SIZE, max))
            })?;
        }
        Ok(self)
    }

    /// Get the socket address for binding.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], self.port)))
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, data_dir: Option<String>) -> Self {
        self.data_dir = data_dir;
        self
    }

    pub fn with_paging(mut self, paging: PagingConfig) -> Self {
        self.paging = paging;
        self
    }

    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), HelixError> {
        if self.request_timeout_secs == 0 {
            return Err(HelixError::Configuration(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        self.paging.validate()?;
        self.store.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.paging.max_page_size, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::new("0.0.0.0", 8080);
        let addr = config.socket_addr();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("helix-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "port = 8181\n\n[paging]\ndefault_page_size = 25\ncursor_secret = \"from-file\"\n",
        )
        .unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.port, 8181);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.paging.default_page_size, 25);
        assert_eq!(config.paging.max_page_size, 1000);
        assert!(!config.paging.uses_development_secret());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::default()
            .with_overrides(|key| match key {
                ENV_CURSOR_SECRET => Some("s3cret".to_string()),
                ENV_MAX_PAGE_SIZE => Some("500".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.paging.cursor_secret, "s3cret");
        assert_eq!(config.paging.max_page_size, 500);

        let err = ServerConfig::default()
            .with_overrides(|key| (key == ENV_MAX_PAGE_SIZE).then(|| "lots".to_string()))
            .unwrap_err();
        assert!(err.is_user_error());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        assert!(ServerConfig::default().with_timeout(0).validate().is_err());
    }
}
