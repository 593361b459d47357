//! Helix Store Pool
//!
//! Bounds the number of requests querying the document store at once.
//! A lease is taken per request and its permit is released when the lease
//! is dropped, on every exit path.
//!
//! @version 0.1.0
//! @author Helix Development Team

use helix_common::{HelixError, StoreConfig};
use helix_document::{DocumentEngine, DocumentStore};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;

// =============================================================================
// Store Pool
// =============================================================================

/// A bounded pool of store leases.
#[derive(Clone)]
pub struct StorePool {
    store: Arc<DocumentEngine>,
    semaphore: Arc<Semaphore>,
    acquire_timeout: Duration,
    size: usize,
    total_acquired: Arc<AtomicU64>,
    total_timeouts: Arc<AtomicU64>,
}

impl StorePool {
    /// Create a pool over a shared engine.
    pub fn new(store: Arc<DocumentEngine>, config: &StoreConfig) -> Self {
        Self {
            store,
            semaphore: Arc::new(Semaphore::new(config.pool_size)),
            acquire_timeout: config.acquire_timeout(),
            size: config.pool_size,
            total_acquired: Arc::new(AtomicU64::new(0)),
            total_timeouts: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait for a lease, giving up after the configured timeout.
    pub async fn acquire(&self) -> Result<StoreLease, HelixError> {
        let permit = match timeout(self.acquire_timeout, self.semaphore.clone().acquire_owned()).await
        {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(HelixError::PoolExhausted),
            Err(_) => {
                self.total_timeouts.fetch_add(1, Ordering::SeqCst);
                return Err(HelixError::Timeout(format!(
                    "no store lease available within {}ms",
                    self.acquire_timeout.as_millis()
                )));
            }
        };

        self.total_acquired.fetch_add(1, Ordering::SeqCst);
        Ok(StoreLease {
            store: Arc::clone(&self.store),
            _permit: permit,
        })
    }

    /// Leases not currently held.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            size: self.size,
            available: self.available(),
            total_acquired: self.total_acquired.load(Ordering::SeqCst),
            total_timeouts: self.total_timeouts.load(Ordering::SeqCst),
        }
    }
}

// =============================================================================
// Store Lease
// =============================================================================

/// Scoped access to the store. Dropping it returns the permit.
pub struct StoreLease {
    store: Arc<DocumentEngine>,
    _permit: OwnedSemaphorePermit,
}

impl StoreLease {
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

// =============================================================================
// Pool Statistics
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    pub size: usize,
    pub available: usize,
    pub total_acquired: u64,
    pub total_timeouts: u64,
}

// =============================================================================
// Tests
// =============================================================================
