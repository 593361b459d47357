//! Helix Request Handlers
//!
//! HTTP request handlers for the REST API: health, collection listing and
//! the paginated document query surface.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::pool::PoolStats;
use crate::state::AppState;
use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use helix_common::HelixError;
use helix_document::StoreError;
use helix_paging::{Envelope, PagingError};
use serde::Serialize;
use thiserror::Error;

/// `Deprecation` response header set when legacy parameters were used.
pub const DEPRECATION_HEADER: &str = "deprecation";

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub pool: PoolStats,
}

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pool: state.pool.stats(),
    })
}

// =============================================================================
// Error Response
// =============================================================================

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl ToString, code: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            code: code.to_string(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

/// Not found handler.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Not found", "NOT_FOUND")),
    )
}

/// Failures of a paged request, mapped onto HTTP responses.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Paging(#[from] PagingError),

    #[error(transparent)]
    Unavailable(#[from] HelixError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Paging(PagingError::UnknownResource(name))
            | ApiError::Paging(PagingError::Store(StoreError::CollectionNotFound(name))) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Collection not found", "NOT_FOUND").with_detail(name),
            ),
            ApiError::Paging(err) if err.is_user_error() => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Invalid query parameters", err.code()).with_detail(&err),
            ),
            ApiError::Paging(err) => {
                tracing::error!(error = %err, "document query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error", err.code()),
                )
            }
            ApiError::Unavailable(err) => {
                tracing::warn!(error = %err, "store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("Service temporarily unavailable", "UNAVAILABLE"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Collection Endpoints
// =============================================================================

/// Collection information.
#[derive(Debug, Serialize)]
pub struct CollectionInfoResponse {
    pub name: String,
    pub document_count: usize,
    /// Whether the collection can be browsed through the paged endpoint.
    pub pageable: bool,
}

/// List collections.
pub async fn list_collections(State(state): State<AppState>) -> Json<Vec<CollectionInfoResponse>> {
    let collections = state
        .document_engine
        .list_collections()
        .iter()
        .filter_map(|name| {
            state
                .document_engine
                .collection_stats(name)
                .map(|stats| CollectionInfoResponse {
                    pageable: state.paging.catalog().get(&stats.name).is_some(),
                    name: stats.name,
                    document_count: stats.document_count,
                })
        })
        .collect();

    Json(collections)
}

/// Paginated, filtered and sorted documents of a collection.
///
/// Parameters are validated before a store lease is taken, so a rejected
/// request never waits on the pool.
pub async fn list_collection_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let plan = state.paging.plan(&collection, &params)?;

    let lease = state.pool.acquire().await?;
    let envelope = state
        .paging
        .execute(lease.store(), plan, uri.path())
        .await?;
    drop(lease);

    Ok(envelope_response(envelope))
}

/// Serialize an envelope, attaching deprecation headers for legacy input.
fn envelope_response(envelope: Envelope) -> Response {
    let mut headers = HeaderMap::new();
    if envelope.is_deprecated() {
        headers.insert(
            HeaderName::from_static(DEPRECATION_HEADER),
            HeaderValue::from_static("true"),
        );
        for deprecation in &envelope.deprecations {
            let warning = format!("299 - \"{}\"", deprecation.message().replace('"', "'"));
            if let Ok(value) = HeaderValue::from_str(&warning) {
                headers.append(axum::http::header::WARNING, value);
            }
        }
    }

    (StatusCode::OK, headers, Json(envelope)).into_response()
}

// =============================================================================
// Tests
// =============================================================================
