//! Helix Document Types
//!
//! Core data types for document storage.
//!
//! @version 0.1.0
//! @author Helix Development Team

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Attribute name under which queries address the document id.
pub const ID_ATTRIBUTE: &str = "_id";
/// Attribute name under which queries address the creation timestamp (epoch millis).
pub const CREATED_AT_ATTRIBUTE: &str = "_created_at";

// =============================================================================
// Document ID
// =============================================================================

/// Unique identifier for a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// Value
// =============================================================================

/// A document value that can be any JSON-compatible type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(HashMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Array(_) | Self::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::String(_) => 3,
            Self::Array(_) => 4,
            Self::Object(_) => 5,
        }
    }

    /// Compare two values of compatible kinds.
    ///
    /// `Null` orders before every other value. Returns `None` for unrelated
    /// kinds; [`Value::sort_cmp`] resolves those by kind rank.
    pub fn partial_compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Null, _) => Some(Ordering::Less),
            (_, Self::Null) => Some(Ordering::Greater),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => Some(a.total_cmp(b)),
            (Self::Int(a), Self::Float(b)) => Some((*a as f64).total_cmp(b)),
            (Self::Float(a), Self::Int(b)) => Some(a.total_cmp(&(*b as f64))),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting and comparison filters; unrelated kinds
    /// fall back to kind rank (null, boolean, number, string, array, object).
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        self.partial_compare(other)
            .unwrap_or_else(|| self.kind_rank().cmp(&other.kind_rank()))
    }

    /// Get a value at a path (e.g., "diagnosis.code").
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let parts: Vec<&str> = path.split('.').collect();
        self.get_path_parts(&parts)
    }

    fn get_path_parts(&self, parts: &[&str]) -> Option<&Value> {
        if parts.is_empty() {
            return Some(self);
        }

        let key = parts[0];
        let rest = &parts[1..];

        match self {
            Self::Object(obj) => obj.get(key).and_then(|v| v.get_path_parts(rest)),
            Self::Array(arr) => key
                .parse::<usize>()
                .ok()
                .and_then(|idx| arr.get(idx))
                .and_then(|v| v.get_path_parts(rest)),
            _ => None,
        }
    }

    /// Convert from serde_json::Value.
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    n.as_f64().map(Self::Float).unwrap_or(Self::Null)
                }
            }
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(arr) => Self::Array(arr.into_iter().map(Self::from_json).collect()),
            JsonValue::Object(obj) => {
                Self::Object(obj.into_iter().map(|(k, v)| (k, Self::from_json(v))).collect())
            }
        }
    }

    /// Convert to serde_json::Value.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(n) => JsonValue::Number((*n).into()),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Array(arr) => JsonValue::Array(arr.iter().map(|v| v.to_json()).collect()),
            Self::Object(obj) => {
                JsonValue::Object(obj.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

// =============================================================================
// Document
// =============================================================================

/// A document in the document store.
///
/// `id` and `created_at` are fixed at construction; only `data` changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub created_at: i64,
    pub data: HashMap<String, Value>,
}

impl Document {
    /// Create a new document with an auto-generated ID.
    pub fn new() -> Self {
        Self::with_id(DocumentId::generate())
    }

    /// Create a document with a specific ID, stamped with the current time.
    pub fn with_id(id: impl Into<DocumentId>) -> Self {
        Self {
            id: id.into(),
            created_at: current_timestamp(),
            data: HashMap::new(),
        }
    }

    /// Create a document with a specific ID and creation timestamp (epoch millis).
    pub fn with_id_at(id: impl Into<DocumentId>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            created_at,
            data: HashMap::new(),
        }
    }

    /// Create a document from JSON.
    ///
    /// Requires `id` (or `_id`) as a non-empty string or an integer, and
    /// `createdAt` as RFC 3339 text or epoch millis. Every other key becomes
    /// data. Nothing is generated, so reloading the same record always
    /// yields the same id and timestamp.
    pub fn from_json(json: JsonValue) -> Result<Self, DocumentError> {
        let JsonValue::Object(obj) = json else {
            return Err(DocumentError::NotAnObject);
        };

        let id = match obj.get("id").or_else(|| obj.get("_id")) {
            Some(JsonValue::String(s)) if !s.is_empty() => DocumentId::new(s.as_str()),
            Some(JsonValue::Number(n)) if n.is_i64() || n.is_u64() => DocumentId::new(n.to_string()),
            Some(other) => return Err(DocumentError::InvalidId(other.to_string())),
            None => return Err(DocumentError::MissingId),
        };

        let created_at = match obj.get("createdAt") {
            Some(value) => parse_timestamp(value)
                .ok_or_else(|| DocumentError::InvalidCreatedAt(id.clone(), value.to_string()))?,
            None => return Err(DocumentError::MissingCreatedAt(id)),
        };

        let data = obj
            .into_iter()
            .filter(|(k, _)| !matches!(k.as_str(), "id" | "_id" | "createdAt"))
            .map(|(k, v)| (k, Value::from_json(v)))
            .collect();

        Ok(Self {
            id,
            created_at,
            data,
        })
    }

    /// Convert to JSON.
    pub fn to_json(&self) -> JsonValue {
        let mut obj = serde_json::Map::new();
        obj.insert("id".to_string(), JsonValue::String(self.id.0.clone()));
        obj.insert(
            "createdAt".to_string(),
            JsonValue::String(format_timestamp(self.created_at)),
        );

        for (k, v) in &self.data {
            obj.insert(k.clone(), v.to_json());
        }

        JsonValue::Object(obj)
    }

    /// Get a data field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if let Some((head, rest)) = key.split_once('.') {
            self.data.get(head).and_then(|v| v.get_path(rest))
        } else {
            self.data.get(key)
        }
    }

    /// Resolve a query attribute, including the reserved `_id` and
    /// `_created_at` attributes. Missing attributes resolve to `Null`.
    pub fn attribute(&self, key: &str) -> Cow<'_, Value> {
        match key {
            ID_ATTRIBUTE => Cow::Owned(Value::String(self.id.0.clone())),
            CREATED_AT_ATTRIBUTE => Cow::Owned(Value::Int(self.created_at)),
            _ => self
                .get(key)
                .map(Cow::Borrowed)
                .unwrap_or(Cow::Owned(Value::Null)),
        }
    }

    /// Set a field value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Check if a field exists.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Get the number of data fields.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the document has no data fields.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Reasons a JSON record cannot become a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    NotAnObject,
    MissingId,
    InvalidId(String),
    MissingCreatedAt(DocumentId),
    InvalidCreatedAt(DocumentId, String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "document is not a JSON object"),
            Self::MissingId => write!(f, "document has no id"),
            Self::InvalidId(raw) => write!(f, "invalid document id: {}", raw),
            Self::MissingCreatedAt(id) => write!(f, "document {} has no createdAt", id),
            Self::InvalidCreatedAt(id, raw) => {
                write!(f, "document {} has an invalid createdAt: {}", id, raw)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

fn current_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

fn parse_timestamp(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.timestamp_millis()),
        _ => None,
    }
}

/// Render epoch millis as an RFC 3339 timestamp.
pub fn format_timestamp(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        .unwrap_or_else(|| millis.to_string())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id() {
        let id1 = DocumentId::generate();
        let id2 = DocumentId::generate();
        assert_ne!(id1, id2);

        let id3 = DocumentId::new("custom-id");
        assert_eq!(id3.as_str(), "custom-id");
    }

    #[test]
    fn test_value_ordering() {
        assert_eq!(Value::Null.sort_cmp(&Value::Int(0)), Ordering::Less);
        assert_eq!(Value::Int(2).sort_cmp(&Value::Float(1.5)), Ordering::Greater);
        assert_eq!(
            Value::from("a").sort_cmp(&Value::from("b")),
            Ordering::Less
        );
        assert_eq!(Value::Bool(false).sort_cmp(&Value::Bool(true)), Ordering::Less);
        assert_eq!(Value::from("x").partial_compare(&Value::Int(1)), None);
        assert_eq!(Value::from("x").sort_cmp(&Value::Int(1)), Ordering::Greater);
    }

    #[test]
    fn test_value_path() {
        let mut inner = HashMap::new();
        inner.insert("code".to_string(), Value::String("C50".to_string()));

        let mut outer = HashMap::new();
        outer.insert("diagnosis".to_string(), Value::Object(inner));

        let value = Value::Object(outer);

        assert_eq!(
            value.get_path("diagnosis.code").and_then(|v| v.as_str()),
            Some("C50")
        );
    }

    #[test]
    fn test_reserved_attributes() {
        let mut doc = Document::with_id_at("s-001", 1_700_000_000_000);
        doc.set("sex", "FEMALE");

        assert_eq!(doc.attribute(ID_ATTRIBUTE).as_str(), Some("s-001"));
        assert_eq!(
            doc.attribute(CREATED_AT_ATTRIBUTE).as_i64(),
            Some(1_700_000_000_000)
        );
        assert_eq!(doc.attribute("sex").as_str(), Some("FEMALE"));
        assert!(doc.attribute("missing").is_null());
    }

    #[test]
    fn test_document_from_json() {
        let json = serde_json::json!({
            "id": "s-123",
            "createdAt": "2024-01-02T03:04:05.000Z",
            "sex": "MALE",
            "hasGenomicData": true
        });

        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.id.as_str(), "s-123");
        assert_eq!(doc.created_at, 1_704_164_645_000);
        assert_eq!(doc.get("sex").and_then(|v| v.as_str()), Some("MALE"));
        assert!(!doc.contains("createdAt"));
    }

    #[test]
    fn test_document_from_json_numeric_id() {
        let json = serde_json::json!({"id": 42, "createdAt": 1_704_067_200_000i64});

        let doc = Document::from_json(json.clone()).unwrap();
        assert_eq!(doc.id.as_str(), "42");
        assert_eq!(doc.created_at, 1_704_067_200_000);

        // Reloading the same record is stable.
        assert_eq!(Document::from_json(json).unwrap(), doc);
    }

    #[test]
    fn test_document_from_json_rejects_unstable_identity() {
        let cases = [
            (serde_json::json!(42), DocumentError::NotAnObject),
            (
                serde_json::json!({"createdAt": 0}),
                DocumentError::MissingId,
            ),
            (
                serde_json::json!({"id": "", "createdAt": 0}),
                DocumentError::InvalidId("\"\"".to_string()),
            ),
            (
                serde_json::json!({"id": 4.5, "createdAt": 0}),
                DocumentError::InvalidId("4.5".to_string()),
            ),
            (
                serde_json::json!({"id": "s-1"}),
                DocumentError::MissingCreatedAt(DocumentId::new("s-1")),
            ),
            (
                serde_json::json!({"id": "s-1", "createdAt": "yesterday"}),
                DocumentError::InvalidCreatedAt(
                    DocumentId::new("s-1"),
                    "\"yesterday\"".to_string(),
                ),
            ),
        ];

        for (json, expected) in cases {
            assert_eq!(Document::from_json(json), Err(expected));
        }
    }

    #[test]
    fn test_json_conversion() {
        let mut doc = Document::with_id_at("s-9", 0);
        doc.set("ageAtDiagnosis", 54i64);

        let json = doc.to_json();
        assert_eq!(json["id"], "s-9");
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00.000Z");
        assert_eq!(json["ageAtDiagnosis"], 54);
    }
}
