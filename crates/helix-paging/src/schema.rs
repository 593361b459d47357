//! Helix Resource Schemas
//!
//! Static allow-lists mapping external parameter names to physical
//! document attributes. Nothing a caller sends reaches query construction
//! without being looked up here first.
//!
//! @version 0.1.0
//! @author Helix Development Team

use helix_document::{Value, CREATED_AT_ATTRIBUTE, ID_ATTRIBUTE};
use std::collections::HashMap;

/// External name of the unique tiebreak field.
pub const TIEBREAK_FIELD: &str = "id";

// =============================================================================
// Field Domains
// =============================================================================

/// Value domain accepted by a filter field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDomain {
    /// One of a fixed set of literals (case-sensitive).
    Enum(Vec<String>),
    /// `true` or `false`.
    Boolean,
    /// Integer within an inclusive range.
    Integer { min: i64, max: i64 },
    /// Free text of bounded length without control characters.
    Text { max_len: usize },
}

impl FieldDomain {
    pub fn enumeration(values: &[&str]) -> Self {
        Self::Enum(values.iter().map(|v| v.to_string()).collect())
    }

    /// Parse and check a raw value against this domain.
    pub fn parse(&self, raw: &str) -> Option<Value> {
        match self {
            Self::Enum(allowed) => allowed
                .iter()
                .any(|v| v == raw)
                .then(|| Value::String(raw.to_string())),
            Self::Boolean => match raw {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            Self::Integer { min, max } => raw
                .parse::<i64>()
                .ok()
                .filter(|n| (*min..=*max).contains(n))
                .map(Value::Int),
            Self::Text { max_len } => {
                let ok = !raw.is_empty()
                    && raw.chars().count() <= *max_len
                    && !raw.chars().any(char::is_control);
                ok.then(|| Value::String(raw.to_string()))
            }
        }
    }

    /// Human-readable description of the domain for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Enum(allowed) => format!("one of: {}", allowed.join(", ")),
            Self::Boolean => "true or false".to_string(),
            Self::Integer { min, max } => format!("an integer between {} and {}", min, max),
            Self::Text { max_len } => format!("text of at most {} characters", max_len),
        }
    }
}

/// Declared kind of a sortable attribute.
///
/// Stored documents are not held to it; ordering and keyset seeks work
/// across kinds. Decoded cursors are checked against it for the tiebreak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    /// Epoch milliseconds.
    Timestamp,
}

impl FieldKind {
    /// Whether a value has this kind (or is `Null` when `nullable`).
    pub fn accepts(&self, value: &Value, nullable: bool) -> bool {
        match (self, value) {
            (_, Value::Null) => nullable,
            (Self::Text, Value::String(_)) => true,
            (Self::Integer | Self::Timestamp, Value::Int(_)) => true,
            (Self::Float, Value::Float(_) | Value::Int(_)) => true,
            (Self::Boolean, Value::Bool(_)) => true,
            _ => false,
        }
    }
}

// =============================================================================
// Fields
// =============================================================================

/// An allow-listed filter field.
#[derive(Debug, Clone)]
pub struct FilterField {
    pub name: String,
    pub attribute: String,
    pub domain: FieldDomain,
}

/// An allow-listed sort field.
#[derive(Debug, Clone)]
pub struct SortField {
    pub name: String,
    pub attribute: String,
    pub kind: FieldKind,
}

// =============================================================================
// Resource Schema
// =============================================================================

/// Allow-lists for one paginated resource.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    collection: String,
    filters: Vec<FilterField>,
    sorts: Vec<SortField>,
    default_sort: String,
}

impl ResourceSchema {
    /// Create a schema whose only sortable field is the `id` tiebreak.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            sorts: vec![SortField {
                name: TIEBREAK_FIELD.to_string(),
                attribute: ID_ATTRIBUTE.to_string(),
                kind: FieldKind::Text,
            }],
            default_sort: TIEBREAK_FIELD.to_string(),
        }
    }

    /// Allow filtering on a field.
    pub fn filter(
        mut self,
        name: impl Into<String>,
        attribute: impl Into<String>,
        domain: FieldDomain,
    ) -> Self {
        self.filters.push(FilterField {
            name: name.into(),
            attribute: attribute.into(),
            domain,
        });
        self
    }

    /// Allow sorting on a field.
    pub fn sort(
        mut self,
        name: impl Into<String>,
        attribute: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        self.sorts.push(SortField {
            name: name.into(),
            attribute: attribute.into(),
            kind,
        });
        self
    }

    /// Sort applied when the caller does not send one.
    pub fn default_sort(mut self, sort: impl Into<String>) -> Self {
        self.default_sort = sort.into();
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn default_sort_spec(&self) -> &str {
        &self.default_sort
    }

    pub fn filter_field(&self, name: &str) -> Option<&FilterField> {
        self.filters.iter().find(|f| f.name == name)
    }

    pub fn sort_field(&self, name: &str) -> Option<&SortField> {
        self.sorts.iter().find(|f| f.name == name)
    }

    pub fn filter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.filters.iter().map(|f| f.name.clone()).collect();
        names.sort();
        names
    }

    pub fn sort_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sorts.iter().map(|f| f.name.clone()).collect();
        names.sort();
        names
    }

    /// The clinical subjects resource.
    pub fn subjects() -> Self {
        Self::new("subjects")
            .filter(
                "sex",
                "sex",
                FieldDomain::enumeration(&["MALE", "FEMALE", "OTHER", "UNKNOWN"]),
            )
            .filter(
                "vitalStatus",
                "vitalStatus",
                FieldDomain::enumeration(&["ALIVE", "DECEASED", "UNKNOWN"]),
            )
            .filter("hasGenomicData", "hasGenomicData", FieldDomain::Boolean)
            .filter(
                "ageAtDiagnosis",
                "ageAtDiagnosis",
                FieldDomain::Integer { min: 0, max: 150 },
            )
            .filter("diagnosis", "diagnosis", FieldDomain::Text { max_len: 256 })
            .filter("cohort", "cohort", FieldDomain::Text { max_len: 128 })
            .sort("createdAt", CREATED_AT_ATTRIBUTE, FieldKind::Timestamp)
            .sort("subjectId", "subjectId", FieldKind::Text)
            .sort("ageAtDiagnosis", "ageAtDiagnosis", FieldKind::Integer)
            .sort("diagnosis", "diagnosis", FieldKind::Text)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Registry of resources exposed for paginated browsing.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: HashMap<String, ResourceSchema>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every built-in resource.
    pub fn builtin() -> Self {
        Self::new().with(ResourceSchema::subjects())
    }

    pub fn with(mut self, schema: ResourceSchema) -> Self {
        self.schemas.insert(schema.collection().to_string(), schema);
        self
    }

    pub fn get(&self, collection: &str) -> Option<&ResourceSchema> {
        self.schemas.get(collection)
    }
}

// =============================================================================
// Tests
// =============================================================================
