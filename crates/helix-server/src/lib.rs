//! Helix Server - Cohort Browser API
//!
//! HTTP boundary for the Helix paging core. Exposes document collections
//! as filtered, sorted and paginated JSON resources.
//!
//! Key Features:
//! - Offset (`page[number]`) and cursor (`page[after]` / `page[before]`) pagination
//! - `filter[<field>]` and `sort` parameters checked against allow-lists
//! - Deprecated `skip` / `limit` parameters answered with `Deprecation` and
//!   `Warning` headers
//! - Bounded store access with per-request timeouts
//!
//! @version 0.1.0
//! @author Helix Development Team

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod pool;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use handlers::ApiError;
pub use pool::{PoolStats, StoreLease, StorePool};
pub use router::create_router;
pub use state::AppState;
