//! Helix Sort Resolver
//!
//! Resolves a `sort` parameter such as `-createdAt,subjectId` into an
//! ordered list of allow-listed keys. The unique `id` tiebreak is always
//! the final key, so no two documents ever compare equal.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::error::{PagingError, Result};
use crate::schema::{FieldKind, ResourceSchema, TIEBREAK_FIELD};
use helix_document::Sort;

const DESCENDING_PREFIX: char = '-';

// =============================================================================
// Sort Keys
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn is_ascending(self) -> bool {
        self == Direction::Ascending
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// One resolved sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// External field name.
    pub name: String,
    /// Physical document attribute.
    pub attribute: String,
    pub kind: FieldKind,
    pub direction: Direction,
}

impl SortKey {
    pub fn is_tiebreak(&self) -> bool {
        self.name == TIEBREAK_FIELD
    }

    fn to_sort(&self) -> Sort {
        Sort {
            field: self.attribute.clone(),
            ascending: self.direction.is_ascending(),
        }
    }
}

// =============================================================================
// Sort Spec
// =============================================================================

/// An ordered, totally-ordering list of sort keys.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
    requested: Option<String>,
}

impl SortSpec {
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// External field names in key order.
    pub fn field_names(&self) -> Vec<&str> {
        self.keys.iter().map(|k| k.name.as_str()).collect()
    }

    /// Store sort keys in forward order.
    pub fn to_sorts(&self) -> Vec<Sort> {
        self.keys.iter().map(SortKey::to_sort).collect()
    }

    /// Store sort keys with every direction flipped.
    pub fn to_reversed_sorts(&self) -> Vec<Sort> {
        self.keys.iter().map(|k| k.to_sort().reversed()).collect()
    }

    /// Canonical form of the caller's `sort` parameter, without the
    /// appended tiebreak. `None` when the caller sent no sort.
    pub fn requested(&self) -> Option<&str> {
        self.requested.as_deref()
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve a raw `sort` parameter against the schema's allow-list.
///
/// An absent or blank parameter selects the schema's default sort.
pub fn resolve_sort(schema: &ResourceSchema, raw: Option<&str>) -> Result<SortSpec> {
    let requested = raw.map(str::trim).filter(|s| !s.is_empty());
    let source = requested.unwrap_or_else(|| schema.default_sort_spec());

    let mut keys: Vec<SortKey> = Vec::new();
    for token in source.split(',') {
        let token = token.trim();
        let (name, direction) = match token.strip_prefix(DESCENDING_PREFIX) {
            Some(name) => (name, Direction::Descending),
            None => (token, Direction::Ascending),
        };

        let field = schema
            .sort_field(name)
            .ok_or_else(|| PagingError::InvalidSortField {
                field: name.to_string(),
                allowed: schema.sort_names(),
            })?;

        // A repeated field can never change the order; the first wins.
        if keys.iter().any(|k| k.name == field.name) {
            continue;
        }

        keys.push(SortKey {
            name: field.name.clone(),
            attribute: field.attribute.clone(),
            kind: field.kind,
            direction,
        });
    }

    let canonical = requested.map(|_| {
        keys.iter()
            .map(|k| match k.direction {
                Direction::Ascending => k.name.clone(),
                Direction::Descending => format!("{}{}", DESCENDING_PREFIX, k.name),
            })
            .collect::<Vec<_>>()
            .join(",")
    });

    if !keys.iter().any(SortKey::is_tiebreak) {
        let tiebreak = schema
            .sort_field(TIEBREAK_FIELD)
            .ok_or_else(|| PagingError::InvalidSortField {
                field: TIEBREAK_FIELD.to_string(),
                allowed: schema.sort_names(),
            })?;
        keys.push(SortKey {
            name: tiebreak.name.clone(),
            attribute: tiebreak.attribute.clone(),
            kind: tiebreak.kind,
            direction: Direction::Ascending,
        });
    }

    Ok(SortSpec {
        keys,
        requested: canonical,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use helix_document::{query::compare_by, Document, CREATED_AT_ATTRIBUTE, ID_ATTRIBUTE};
    use std::cmp::Ordering;

    #[test]
    fn test_default_sort_is_tiebreak_only() {
        let spec = resolve_sort(&ResourceSchema::subjects(), None).unwrap();
        assert_eq!(spec.field_names(), vec!["id"]);
        assert_eq!(spec.requested(), None);
        assert_eq!(spec.to_sorts(), vec![Sort::asc(ID_ATTRIBUTE)]);

        let blank = resolve_sort(&ResourceSchema::subjects(), Some("  ")).unwrap();
        assert_eq!(blank, spec);
    }

    #[test]
    fn test_descending_prefix_and_tiebreak_append() {
        let spec =
            resolve_sort(&ResourceSchema::subjects(), Some("-createdAt,subjectId")).unwrap();

        assert_eq!(spec.field_names(), vec!["createdAt", "subjectId", "id"]);
        assert_eq!(
            spec.to_sorts(),
            vec![
                Sort::desc(CREATED_AT_ATTRIBUTE),
                Sort::asc("subjectId"),
                Sort::asc(ID_ATTRIBUTE),
            ]
        );
        assert_eq!(spec.requested(), Some("-createdAt,subjectId"));
        assert_eq!(
            spec.to_reversed_sorts(),
            vec![
                Sort::asc(CREATED_AT_ATTRIBUTE),
                Sort::desc("subjectId"),
                Sort::desc(ID_ATTRIBUTE),
            ]
        );
    }

    #[test]
    fn test_explicit_tiebreak_keeps_its_direction() {
        let spec = resolve_sort(&ResourceSchema::subjects(), Some("-id")).unwrap();
        assert_eq!(spec.keys().len(), 1);
        assert_eq!(spec.keys()[0].direction, Direction::Descending);
        assert_eq!(spec.requested(), Some("-id"));
    }

    #[test]
    fn test_repeated_field_keeps_first_direction() {
        let spec =
            resolve_sort(&ResourceSchema::subjects(), Some("createdAt,-createdAt")).unwrap();
        assert_eq!(spec.field_names(), vec!["createdAt", "id"]);
        assert_eq!(spec.requested(), Some("createdAt"));
    }

    #[test]
    fn test_unknown_field_lists_allowed() {
        let err = resolve_sort(&ResourceSchema::subjects(), Some("createdAt,-ssn")).unwrap_err();
        match err {
            PagingError::InvalidSortField { field, allowed } => {
                assert_eq!(field, "ssn");
                assert!(allowed.contains(&"createdAt".to_string()));
                assert!(allowed.contains(&"id".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(resolve_sort(&ResourceSchema::subjects(), Some("createdAt,,id")).is_err());
    }

    #[test]
    fn test_duplicate_primary_values_are_totally_ordered() {
        let mut a = Document::with_id_at("b", 100);
        a.set("subjectId", "S-1");
        let mut b = Document::with_id_at("a", 100);
        b.set("subjectId", "S-1");

        let spec =
            resolve_sort(&ResourceSchema::subjects(), Some("-createdAt,subjectId")).unwrap();
        assert_eq!(compare_by(&spec.to_sorts(), &a, &b), Ordering::Greater);
        assert_eq!(compare_by(&spec.to_sorts(), &b, &a), Ordering::Less);
    }
}
