//! Helix Document - Document Store Engine
//!
//! Schema-flexible JSON document storage with the filtered, sorted and
//! windowed scans the paging core is built on.
//!
//! Key Features:
//! - JSON document model with immutable id and creation timestamp
//! - Total ordering over scalar values for deterministic sorts
//! - Composite filter predicates (And / Or / Not over comparisons)
//! - Async `DocumentStore` trait decoupling the core from the engine
//!
//! @version 0.1.0
//! @author Helix Development Team

pub mod collection;
pub mod engine;
pub mod query;
pub mod store;
pub mod types;

pub use collection::{Collection, CollectionError};
pub use engine::{CollectionStats, DocumentEngine, StoreError};
pub use query::{Filter, Query, QueryResult, Sort};
pub use store::DocumentStore;
pub use types::{Document, DocumentError, DocumentId, Value, CREATED_AT_ATTRIBUTE, ID_ATTRIBUTE};
