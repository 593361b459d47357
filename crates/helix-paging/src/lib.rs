//! Helix Paging - Paginated Collection Queries
//!
//! Filtered, sorted and paginated views over a document collection, in
//! two modes: page-number (offset) pagination with exact totals, and
//! keyset (cursor) pagination that stays stable while the collection
//! changes underneath it.
//!
//! Key Features:
//! - Allow-listed filter and sort fields mapped to physical attributes
//! - Mandatory unique tiebreak for a deterministic total order
//! - Opaque, HMAC-signed cursors
//! - Navigation links and a uniform `{ data, meta, links }` envelope
//! - Deprecated `skip` / `limit` / bare filter parameters still accepted
//!
//! @version 0.1.0
//! @author Helix Development Team

pub mod cursor;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod keyset;
pub mod links;
pub mod offset;
pub mod params;
pub mod schema;
pub mod sort;

pub use cursor::{Anchor, CursorCodec};
pub use engine::{PagingEngine, QueryPlan, Window};
pub use envelope::{CursorMeta, Envelope, Links, OffsetMeta, Page, PageMeta};
pub use error::{PagingError, Result};
pub use filter::{validate_filters, FilterSpec};
pub use keyset::{CursorPaginator, Seek};
pub use links::LinkBuilder;
pub use offset::OffsetPaginator;
pub use params::{parse_params, CursorPosition, Deprecation, PageParams, PageRequest};
pub use schema::{FieldDomain, FieldKind, ResourceSchema, SchemaCatalog};
pub use sort::{resolve_sort, Direction, SortKey, SortSpec};
