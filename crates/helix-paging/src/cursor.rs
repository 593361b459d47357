//! Helix Cursor Codec
//!
//! Opaque, tamper-evident page cursors. A token is the URL-safe base64 of
//! a small JSON payload naming the anchor document's sort-key values,
//! followed by a truncated HMAC-SHA256 tag over that payload.
//!
//! Decoding never panics. Every rejection, whatever the cause, surfaces
//! as [`PagingError::InvalidCursor`]; the reason is logged at debug.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::error::{PagingError, Result};
use crate::sort::SortSpec;
use data_encoding::BASE64URL_NOPAD;
use helix_common::{HelixError, PagingConfig};
use helix_document::{Document, Value};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Payload format version.
const CURSOR_VERSION: u32 = 1;

/// Bytes of the HMAC tag kept in each token.
const TAG_LEN: usize = 16;

// =============================================================================
// Anchor
// =============================================================================

/// The sort-key values of one document, in sort-key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    values: Vec<(String, Value)>,
}

impl Anchor {
    pub fn new(values: Vec<(String, Value)>) -> Self {
        Self { values }
    }

    /// Capture a document's position under a sort spec.
    pub fn from_document(doc: &Document, spec: &SortSpec) -> Self {
        let values = spec
            .keys()
            .iter()
            .map(|key| (key.name.clone(), doc.attribute(&key.attribute).into_owned()))
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[(String, Value)] {
        &self.values
    }

    /// Value for an external field name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

#[derive(Deserialize)]
struct CursorPayload {
    v: u32,
    k: Vec<(String, JsonValue)>,
}

// =============================================================================
// Codec
// =============================================================================

/// Encodes and decodes page cursors with a shared signing key.
#[derive(Clone)]
pub struct CursorCodec {
    mac: HmacSha256,
    max_len: usize,
}

impl std::fmt::Debug for CursorCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorCodec")
            .field("max_len", &self.max_len)
            .finish_non_exhaustive()
    }
}

impl CursorCodec {
    /// Create a codec from the paging configuration.
    pub fn new(config: &PagingConfig) -> helix_common::Result<Self> {
        let mac = HmacSha256::new_from_slice(config.cursor_secret.as_bytes())
            .map_err(|e| HelixError::Configuration(format!("invalid cursor secret: {}", e)))?;
        Ok(Self {
            mac,
            max_len: config.max_cursor_len,
        })
    }

    /// Encode an anchor as an opaque token.
    pub fn encode(&self, anchor: &Anchor) -> String {
        let keys: Vec<JsonValue> = anchor
            .values
            .iter()
            .map(|(name, value)| json!([name, value.to_json()]))
            .collect();
        let payload = json!({ "v": CURSOR_VERSION, "k": keys }).to_string();

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        let tag = mac.finalize().into_bytes();

        let mut bytes = payload.into_bytes();
        bytes.extend_from_slice(&tag[..TAG_LEN]);
        BASE64URL_NOPAD.encode(&bytes)
    }

    /// Encode the position of a document under a sort spec.
    pub fn encode_document(&self, doc: &Document, spec: &SortSpec) -> String {
        self.encode(&Anchor::from_document(doc, spec))
    }

    /// Decode a token and check it against the current sort spec.
    pub fn decode(&self, token: &str, spec: &SortSpec) -> Result<Anchor> {
        self.try_decode(token, spec).map_err(|reason| {
            debug!(reason, "rejected page cursor");
            PagingError::InvalidCursor
        })
    }

    fn try_decode(&self, token: &str, spec: &SortSpec) -> std::result::Result<Anchor, &'static str> {
        if token.is_empty() {
            return Err("empty token");
        }
        if token.len() > self.max_len {
            return Err("token too long");
        }

        let bytes = BASE64URL_NOPAD
            .decode(token.as_bytes())
            .map_err(|_| "not base64url")?;
        if bytes.len() <= TAG_LEN {
            return Err("token too short");
        }

        let (payload, tag) = bytes.split_at(bytes.len() - TAG_LEN);
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.verify_truncated_left(tag).map_err(|_| "signature mismatch")?;

        let parsed: CursorPayload =
            serde_json::from_slice(payload).map_err(|_| "malformed payload")?;
        if parsed.v != CURSOR_VERSION {
            return Err("unsupported version");
        }

        let keys = spec.keys();
        if parsed.k.len() != keys.len() {
            return Err("sort key count mismatch");
        }

        let mut values = Vec::with_capacity(keys.len());
        for ((name, raw), key) in parsed.k.into_iter().zip(keys) {
            if name != key.name {
                return Err("sort field mismatch");
            }
            let value = Value::from_json(raw);
            // Documents may hold any kind under a sort attribute, and the tag
            // already proves the value came from an issued cursor. Only the
            // tiebreak, which names a document, must have its declared kind.
            if key.is_tiebreak() && !key.kind.accepts(&value, false) {
                return Err("tiebreak value type mismatch");
            }
            values.push((name, value));
        }

        Ok(Anchor { values })
    }
}

// =============================================================================
// Tests
// =============================================================================
