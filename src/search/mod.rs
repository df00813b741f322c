//! Client-side search over a loaded collection.
//!
//! Pure functions from (authoritative records, filter) to the working records. Order is
//! preserved and nothing is ranked. Fields that are not strings are skipped, never an error.

use serde_json::Value;

use crate::form::FieldPath;
use crate::models::Record;

/// Exact match on one string, possibly nested, e.g. `appliedFor.career[0].title` for
/// applications to a single career. Records where the path is missing or not a string are
/// left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub path: FieldPath,
    pub value: String,
}

impl Facet {
    pub fn new(path: FieldPath, value: impl Into<String>) -> Self {
        Self {
            path,
            value: value.into(),
        }
    }

    fn accepts(&self, record: &Record) -> bool {
        record.lookup(&self.path).and_then(Value::as_str) == Some(self.value.as_str())
    }
}

/// Everything that narrows the working copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub query: String,
    pub facet: Option<Facet>,
    /// Look at strings inside nested lists and objects too
    pub deep: bool,
}

impl Filter {
    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || self.facet.is_some()
    }
}

/// Records whose string fields contain `query`, case-insensitively.
///
/// An empty query returns the input unchanged.
pub fn apply_filter(records: &[Record], query: &str) -> Vec<Record> {
    apply(
        records,
        &Filter {
            query: query.to_string(),
            ..Filter::default()
        },
    )
}

/// Apply query and facet together.
pub fn apply(records: &[Record], filter: &Filter) -> Vec<Record> {
    if !filter.is_active() {
        return records.to_vec();
    }

    let needle = filter.query.to_lowercase();

    records
        .iter()
        .filter(|r| filter.facet.as_ref().map_or(true, |f| f.accepts(r)))
        .filter(|r| needle.is_empty() || matches(r, &needle, filter.deep))
        .cloned()
        .collect()
}

/// Whether `record` has a string field containing the already-lowercased `needle`.
pub fn matches(record: &Record, needle: &str, deep: bool) -> bool {
    if deep {
        record.fields().values().any(|v| value_contains(v, needle))
    } else {
        record
            .scalar_strings()
            .any(|s| s.to_lowercase().contains(needle))
    }
}

fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|v| value_contains(v, needle)),
        Value::Object(map) => map.values().any(|v| value_contains(v, needle)),
        _ => false,
    }
}
