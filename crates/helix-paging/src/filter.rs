//! Helix Filter Validator
//!
//! Validates caller-supplied `filter[...]` values against a resource's
//! allow-list and turns them into equality predicates on physical
//! attributes.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::error::{PagingError, Result};
use crate::schema::ResourceSchema;
use helix_document::{Filter, Value};
use std::collections::BTreeMap;

// =============================================================================
// Filter Spec
// =============================================================================

/// One validated filter entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    pub attribute: String,
    pub value: Value,
    /// The value as the caller sent it, for re-serializing links.
    pub raw: String,
}

/// Validated filters keyed by external field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    entries: BTreeMap<String, FilterEntry>,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&FilterEntry> {
        self.entries.get(name)
    }

    /// Store predicates for this spec.
    pub fn to_filters(&self) -> Vec<Filter> {
        self.entries
            .values()
            .map(|e| Filter::Eq {
                field: e.attribute.clone(),
                value: e.value.clone(),
            })
            .collect()
    }

    /// `(filter[name], raw)` pairs ordered by field name.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(name, e)| (format!("filter[{}]", name), e.raw.clone()))
            .collect()
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validate raw filter values against the schema's allow-list.
pub fn validate_filters(
    schema: &ResourceSchema,
    raw: &BTreeMap<String, String>,
) -> Result<FilterSpec> {
    let mut spec = FilterSpec::default();

    for (name, value) in raw {
        let field = schema
            .filter_field(name)
            .ok_or_else(|| PagingError::InvalidFilterField {
                field: name.clone(),
                allowed: schema.filter_names(),
            })?;

        let parsed = field
            .domain
            .parse(value)
            .ok_or_else(|| PagingError::InvalidFilterValue {
                field: name.clone(),
                value: value.clone(),
                expected: field.domain.describe(),
            })?;

        spec.entries.insert(
            name.clone(),
            FilterEntry {
                attribute: field.attribute.clone(),
                value: parsed,
                raw: value.clone(),
            },
        );
    }

    Ok(spec)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_empty_spec() {
        let spec = validate_filters(&ResourceSchema::subjects(), &BTreeMap::new()).unwrap();
        assert!(spec.is_empty());
        assert!(spec.to_filters().is_empty());
    }

    #[test]
    fn test_valid_filters_are_normalized() {
        let spec = validate_filters(
            &ResourceSchema::subjects(),
            &raw(&[("sex", "MALE"), ("hasGenomicData", "true")]),
        )
        .unwrap();

        assert_eq!(spec.len(), 2);
        assert_eq!(spec.get("hasGenomicData").unwrap().value, Value::Bool(true));
        assert_eq!(
            spec.query_pairs(),
            vec![
                ("filter[hasGenomicData]".to_string(), "true".to_string()),
                ("filter[sex]".to_string(), "MALE".to_string()),
            ]
        );
        assert!(spec.to_filters().contains(&Filter::eq("sex", "MALE")));
    }

    #[test]
    fn test_invalid_enum_value_names_allowed_values() {
        let err = validate_filters(&ResourceSchema::subjects(), &raw(&[("sex", "INVALID_VALUE")]))
            .unwrap_err();

        match &err {
            PagingError::InvalidFilterValue { field, expected, .. } => {
                assert_eq!(field, "sex");
                assert_eq!(expected, "one of: MALE, FEMALE, OTHER, UNKNOWN");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("MALE, FEMALE, OTHER, UNKNOWN"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = validate_filters(&ResourceSchema::subjects(), &raw(&[("$where", "1")]))
            .unwrap_err();
        assert!(matches!(err, PagingError::InvalidFilterField { ref field, .. } if field == "$where"));
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let err = validate_filters(
            &ResourceSchema::subjects(),
            &raw(&[("ageAtDiagnosis", "forty")]),
        )
        .unwrap_err();
        assert!(matches!(err, PagingError::InvalidFilterValue { .. }));
    }
}
