//! Helix Document Query
//!
//! Scan language for document filtering, ordering and windowing. This is
//! the whole contract the paging core relies on: AND-ed filter predicates,
//! an ordered list of sort keys, and skip/limit.
//!
//! @version 0.1.0
//! @author Helix Development Team

use crate::types::{Document, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// =============================================================================
// Query
// =============================================================================

/// A query for filtering, ordering and windowing documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub sort: Vec<Sort>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a document matches this query.
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }

    /// Compare two documents under this query's sort keys.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        compare_by(&self.sort, a, b)
    }

    /// Add a filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append a sort key.
    pub fn with_sort(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort.push(Sort {
            field: field.into(),
            ascending,
        });
        self
    }

    /// Add skip.
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Add limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Lexicographic comparison over a list of sort keys.
pub fn compare_by(keys: &[Sort], a: &Document, b: &Document) -> Ordering {
    for key in keys {
        let ord = a
            .attribute(&key.field)
            .sort_cmp(&b.attribute(&key.field));
        let ord = if key.ascending { ord } else { ord.reverse() };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

// =============================================================================
// Filter
// =============================================================================

/// A filter condition over document attributes.
///
/// Missing attributes compare as `Null`, which sorts first. Values of
/// different kinds compare by kind rank, so `Gt`/`Lt` agree with the
/// ordering produced by [`Sort`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Eq { field: String, value: Value },
    Ne { field: String, value: Value },
    Gt { field: String, value: Value },
    Lt { field: String, value: Value },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn negate(filter: Filter) -> Self {
        Self::Not(Box::new(filter))
    }

    /// Check if a document matches this filter.
    ///
    /// Comparisons use [`Value::sort_cmp`], the same total order as
    /// [`compare_by`], so a `Gt` seek from any sorted position selects
    /// exactly the documents that sort after it, whatever their kinds.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::Eq { field, value } => doc.attribute(field).sort_cmp(value) == Ordering::Equal,
            Self::Ne { field, value } => doc.attribute(field).sort_cmp(value) != Ordering::Equal,
            Self::Gt { field, value } => doc.attribute(field).sort_cmp(value) == Ordering::Greater,
            Self::Lt { field, value } => doc.attribute(field).sort_cmp(value) == Ordering::Less,
            Self::And(filters) => filters.iter().all(|f| f.matches(doc)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(doc)),
            Self::Not(filter) => !filter.matches(doc),
        }
    }
}

// =============================================================================
// Sort
// =============================================================================

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub ascending: bool,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }

    /// The same key with its direction flipped.
    pub fn reversed(&self) -> Self {
        Self {
            field: self.field.clone(),
            ascending: !self.ascending,
        }
    }
}

// =============================================================================
// Query Result
// =============================================================================

/// Result of a document query.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub documents: Vec<Document>,
    pub total_scanned: usize,
    pub execution_time_ms: u64,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self {
            documents: Vec::new(),
            total_scanned: 0,
            execution_time_ms: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_doc() -> Document {
        let mut doc = Document::with_id_at("s-1", 1_000);
        doc.set("sex", "FEMALE");
        doc.set("ageAtDiagnosis", 54i64);
        doc.set("hasGenomicData", true);
        doc
    }

    #[test]
    fn test_eq_filter() {
        let doc = create_test_doc();

        assert!(Filter::eq("sex", "FEMALE").matches(&doc));
        assert!(!Filter::eq("sex", "MALE").matches(&doc));
        assert!(Filter::eq("_id", "s-1").matches(&doc));
        assert!(Filter::eq("missing", Value::Null).matches(&doc));
    }

    #[test]
    fn test_comparison_filters() {
        let doc = create_test_doc();

        assert!(Filter::gt("ageAtDiagnosis", 50i64).matches(&doc));
        assert!(!Filter::lt("ageAtDiagnosis", 50i64).matches(&doc));
        assert!(Filter::gt("_created_at", 999i64).matches(&doc));
        // Null sorts first, so a missing attribute is below any value.
        assert!(Filter::lt("missing", 0i64).matches(&doc));
        // Strings rank above numbers, as they do when sorting.
        assert!(Filter::gt("sex", 1i64).matches(&doc));
        assert!(!Filter::lt("sex", 1i64).matches(&doc));
        assert!(!Filter::eq("sex", 1i64).matches(&doc));
        // Integers and floats compare numerically.
        assert!(Filter::eq("ageAtDiagnosis", 54.0).matches(&doc));
        assert!(Filter::lt("ageAtDiagnosis", 54.5).matches(&doc));
    }

    #[test]
    fn test_comparisons_agree_with_sort_order() {
        let values = [
            Value::Null,
            Value::Bool(true),
            Value::Int(10),
            Value::Float(20.5),
            Value::from("C18"),
            Value::from("unknown"),
        ];
        let docs: Vec<Document> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut doc = Document::with_id_at(format!("d{}", i), 0);
                doc.set("diagnosis", v.clone());
                doc
            })
            .collect();

        for (i, pivot) in values.iter().enumerate() {
            let after: Vec<usize> = (0..docs.len())
                .filter(|&j| Filter::gt("diagnosis", pivot.clone()).matches(&docs[j]))
                .collect();
            let before: Vec<usize> = (0..docs.len())
                .filter(|&j| Filter::lt("diagnosis", pivot.clone()).matches(&docs[j]))
                .collect();
            assert_eq!(after, ((i + 1)..docs.len()).collect::<Vec<_>>());
            assert_eq!(before, (0..i).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_logical_filters() {
        let doc = create_test_doc();

        let filter = Filter::And(vec![
            Filter::eq("sex", "FEMALE"),
            Filter::gt("ageAtDiagnosis", 20i64),
        ]);
        assert!(filter.matches(&doc));

        let filter = Filter::Or(vec![
            Filter::eq("sex", "MALE"),
            Filter::eq("hasGenomicData", true),
        ]);
        assert!(filter.matches(&doc));

        assert!(!Filter::negate(filter).matches(&doc));
    }

    #[test]
    fn test_compare_by_keys() {
        let mut a = Document::with_id_at("a", 5);
        a.set("subjectId", "S2");
        let mut b = Document::with_id_at("b", 5);
        b.set("subjectId", "S1");

        let query = Query::new().with_sort("_created_at", false).with_sort("_id", true);
        assert_eq!(query.compare(&a, &b), Ordering::Less);

        let query = Query::new().with_sort("subjectId", true);
        assert_eq!(query.compare(&a, &b), Ordering::Greater);
    }
}
