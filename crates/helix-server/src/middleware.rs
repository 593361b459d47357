//! Helix Middleware
//!
//! Request correlation. Each request carries an `x-request-id`, either the
//! caller's own or a freshly generated one, which is echoed on the response
//! and attached to the request's tracing span.
//!
//! @version 0.1.0
//! @author Helix Development Team

use axum::{
    body::Body,
    http::{HeaderValue, Request, Response},
    middleware::Next,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request id that is reused as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

// =============================================================================
// Request ID Middleware
// =============================================================================

/// Add a request ID to each request and its response.
pub async fn request_id(mut request: Request<Body>, next: Next) -> Response<Body> {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let header =
        HeaderValue::from_str(&request_id).unwrap_or_else(|_| HeaderValue::from_static("unknown"));
    request.headers_mut().insert(REQUEST_ID_HEADER, header.clone());

    let span = tracing::info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span).await;

    response.headers_mut().insert(REQUEST_ID_HEADER, header);
    response
}

// =============================================================================
// Tests
// =============================================================================
