//! Record model: one item of a remote collection, kept as raw JSON fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::form::{FieldPath, Step};

/// A record mirrored from the backend.
///
/// Shapes differ per resource, so fields stay as JSON. The server-assigned id lives in a
/// field whose name the resource declares (`_id` for this backend).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AppError::UnexpectedShape(format!(
                "Expected a JSON object for a record, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Server id as a string; numeric ids are rendered in decimal.
    pub fn id(&self, id_field: &str) -> Option<String> {
        match self.0.get(id_field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Value at a nested path, walking objects by key and arrays by index.
    pub fn lookup(&self, path: &FieldPath) -> Option<&Value> {
        path.steps()
            .iter()
            .try_fold(self.0.get(path.root())?, |value, step| match (step, value) {
                (Step::Key(name), Value::Object(map)) => map.get(name),
                (Step::Index(i), Value::Array(items)) => items.get(*i),
                _ => None,
            })
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Values of the top-level string fields.
    pub fn scalar_strings(&self) -> impl Iterator<Item = &str> {
        self.0.values().filter_map(Value::as_str)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_accepts_strings_and_numbers() {
        let r = Record::from_value(json!({ "_id": "65a1", "title": "A" })).unwrap();
        assert_eq!(r.id("_id").as_deref(), Some("65a1"));

        let r = Record::from_value(json!({ "id": 42 })).unwrap();
        assert_eq!(r.id("id").as_deref(), Some("42"));
        assert_eq!(r.id("_id"), None);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        let err = Record::from_value(json!(["a"])).unwrap_err();
        assert!(matches!(err, AppError::UnexpectedShape(_)));
    }

    #[test]
    fn test_scalar_strings_skip_other_types() {
        let r = Record::from_value(json!({
            "title": "Alpha",
            "number": 3,
            "qa": [{ "question": "hidden" }],
            "subtitle": "Beta"
        }))
        .unwrap();
        let mut strings: Vec<&str> = r.scalar_strings().collect();
        strings.sort();
        assert_eq!(strings, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_lookup_walks_objects_and_arrays() {
        let r = Record::from_value(json!({
            "name": "Sara",
            "appliedFor": { "career": [{ "title": "Designer" }] }
        }))
        .unwrap();

        let title = FieldPath::field("appliedFor").key("career").index(0).key("title");
        assert_eq!(r.lookup(&title), Some(&json!("Designer")));
        assert_eq!(r.lookup(&FieldPath::field("name")), Some(&json!("Sara")));

        let past_end = FieldPath::field("appliedFor").key("career").index(1).key("title");
        assert_eq!(r.lookup(&past_end), None);
        assert_eq!(r.lookup(&FieldPath::field("name").index(0)), None);
        assert_eq!(r.lookup(&FieldPath::field("missing")), None);
    }
}
