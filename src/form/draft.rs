//! Draft records built on persistent collections.
//!
//! Every edit returns a new [`Draft`]; the previous one stays valid and unchanged. Maps and
//! lists are `im` structures, so an edit copies only the spine from the root to the edited
//! slot and shares everything else.

use std::path::{Path, PathBuf};

use im::{OrdMap, Vector};
use serde_json::{Map, Number, Value};

use super::path::{FieldPath, Step};
use crate::errors::AppError;
use crate::models::Record;

/// A file the user picked locally. The bytes are read only when the payload is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    pub path: PathBuf,
    pub file_name: String,
}

impl FileBlob {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Self { path, file_name }
    }
}

/// Value of a file field that is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// Path the server stored earlier; read-only on the client
    Stored(String),
    /// Newly selected blob that replaces the stored path on submit
    Selected(FileBlob),
}

/// One value inside a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vector<DraftValue>),
    Object(OrdMap<String, DraftValue>),
    File(Attachment),
}

impl DraftValue {
    pub fn text(value: impl Into<String>) -> Self {
        DraftValue::Text(value.into())
    }

    pub fn list<I: IntoIterator<Item = DraftValue>>(items: I) -> Self {
        DraftValue::List(items.into_iter().collect())
    }

    pub fn object<K: Into<String>, I: IntoIterator<Item = (K, DraftValue)>>(fields: I) -> Self {
        DraftValue::Object(
            fields
                .into_iter()
                .map(|(k, v)| -> (String, DraftValue) { (k.into(), v) })
                .collect(),
        )
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => DraftValue::Null,
            Value::Bool(b) => DraftValue::Bool(*b),
            Value::Number(n) => DraftValue::Number(n.clone()),
            Value::String(s) => DraftValue::Text(s.clone()),
            Value::Array(items) => DraftValue::List(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => DraftValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// JSON form used for JSON payloads and JSON-encoded multipart parts.
    ///
    /// A stored attachment keeps its path; a selected blob becomes `null` because its bytes
    /// travel in their own part.
    pub fn to_json(&self) -> Value {
        match self {
            DraftValue::Null => Value::Null,
            DraftValue::Bool(b) => Value::Bool(*b),
            DraftValue::Number(n) => Value::Number(n.clone()),
            DraftValue::Text(s) => Value::String(s.clone()),
            DraftValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            DraftValue::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
            DraftValue::File(Attachment::Stored(path)) => Value::String(path.clone()),
            DraftValue::File(Attachment::Selected(_)) => Value::Null,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DraftValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vector<DraftValue>> {
        match self {
            DraftValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DraftValue::Null)
    }

    fn collect_selected(&self, at: FieldPath, out: &mut Vec<(FieldPath, FileBlob)>) {
        match self {
            DraftValue::File(Attachment::Selected(blob)) => out.push((at, blob.clone())),
            DraftValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    item.collect_selected(at.clone().index(i), out);
                }
            }
            DraftValue::Object(map) => {
                for (k, v) in map.iter() {
                    v.collect_selected(at.clone().key(k.clone()), out);
                }
            }
            _ => {}
        }
    }
}

impl From<&str> for DraftValue {
    fn from(value: &str) -> Self {
        DraftValue::Text(value.to_string())
    }
}

impl From<String> for DraftValue {
    fn from(value: String) -> Self {
        DraftValue::Text(value)
    }
}

impl From<i64> for DraftValue {
    fn from(value: i64) -> Self {
        DraftValue::Number(value.into())
    }
}

impl From<bool> for DraftValue {
    fn from(value: bool) -> Self {
        DraftValue::Bool(value)
    }
}

/// Where file fields live in a record shape, and the multipart part names their uploads use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileField {
    /// Top-level field, e.g. `image`
    Top(String),
    /// Key inside every object of a list field, e.g. `exp[].icon`.
    ///
    /// With `part` set, every new file goes out as a repeated part of that name (`exp_icon`).
    /// Without it, each part is named in bracket form (`mission[0][icon]`).
    InList {
        list: String,
        key: String,
        part: Option<String>,
    },
    /// List whose elements are files, e.g. `img[]`, sent as repeated parts named after the list
    Files(String),
}

impl FileField {
    pub fn top(name: &str) -> Self {
        FileField::Top(name.to_string())
    }

    pub fn in_list(list: &str, key: &str) -> Self {
        FileField::InList {
            list: list.to_string(),
            key: key.to_string(),
            part: None,
        }
    }

    pub fn in_list_as(list: &str, key: &str, part: &str) -> Self {
        FileField::InList {
            list: list.to_string(),
            key: key.to_string(),
            part: Some(part.to_string()),
        }
    }

    pub fn files(list: &str) -> Self {
        FileField::Files(list.to_string())
    }

    /// Top-level field holding the files.
    pub fn field(&self) -> &str {
        match self {
            FileField::Top(name) | FileField::Files(name) => name,
            FileField::InList { list, .. } => list,
        }
    }

    /// Part name for a file selected at `path`, when `path` belongs to this field.
    pub fn part_name(&self, path: &FieldPath) -> Option<String> {
        if path.root() != self.field() {
            return None;
        }
        match (self, path.steps()) {
            (FileField::Top(name), []) => Some(name.clone()),
            (FileField::InList { key, part, .. }, [Step::Index(_), Step::Key(k)]) if k == key => {
                Some(part.clone().unwrap_or_else(|| path.form_key()))
            }
            (FileField::Files(list), [Step::Index(_)]) => Some(list.clone()),
            _ => None,
        }
    }
}

/// A record under construction or edit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Draft {
    fields: OrdMap<String, DraftValue>,
}

impl Draft {
    pub fn new<K: Into<String>, I: IntoIterator<Item = (K, DraftValue)>>(fields: I) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| -> (String, DraftValue) { (k.into(), v) })
                .collect(),
        }
    }

    /// Seed an edit draft from a record.
    ///
    /// Starts from the template so every form field exists, then overlays the record's
    /// values. File fields holding a path become stored attachments; an empty path is
    /// treated as absent.
    pub fn seed(record: &Record, template: &Draft, file_fields: &[FileField], id_field: &str) -> Self {
        let mut fields = template.fields.clone();

        for (name, value) in record.fields() {
            if name == id_field {
                continue;
            }
            fields.insert(name.clone(), DraftValue::from_json(value));
        }

        for file_field in file_fields {
            match file_field {
                FileField::Top(name) => {
                    if let Some(value) = fields.get(name).cloned() {
                        fields.insert(name.clone(), as_stored_attachment(value));
                    }
                }
                FileField::InList { list, key, .. } => {
                    if let Some(DraftValue::List(items)) = fields.get(list).cloned() {
                        let items = items
                            .into_iter()
                            .map(|item| match item {
                                DraftValue::Object(mut map) => {
                                    if let Some(value) = map.get(key).cloned() {
                                        map.insert(key.clone(), as_stored_attachment(value));
                                    }
                                    DraftValue::Object(map)
                                }
                                other => other,
                            })
                            .collect();
                        fields.insert(list.clone(), DraftValue::List(items));
                    }
                }
                FileField::Files(list) => {
                    if let Some(DraftValue::List(items)) = fields.get(list).cloned() {
                        let items = items.into_iter().map(as_stored_attachment).collect();
                        fields.insert(list.clone(), DraftValue::List(items));
                    }
                }
            }
        }

        Self { fields }
    }

    pub fn get(&self, path: &FieldPath) -> Option<&DraftValue> {
        let mut current = self.fields.get(path.root())?;
        for step in path.steps() {
            current = match (step, current) {
                (Step::Key(k), DraftValue::Object(map)) => map.get(k)?,
                (Step::Index(i), DraftValue::List(items)) => items.get(*i)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Top-level fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &DraftValue)> {
        self.fields.iter()
    }

    pub fn field(&self, name: &str) -> Option<&DraftValue> {
        self.fields.get(name)
    }

    /// New draft with exactly `path` replaced by `value`.
    ///
    /// A top-level field may be introduced; below the root, objects accept new keys but list
    /// indices must already exist (use [`Draft::add_list_item`] to grow a list).
    pub fn set_field(&self, path: &FieldPath, value: DraftValue) -> Result<Draft, AppError> {
        let updated = match self.fields.get(path.root()) {
            Some(current) => replace_at(current, path.steps(), value, path)?,
            None if path.is_top_level() => value,
            None => return Err(unresolved(path)),
        };
        Ok(Draft {
            fields: self.fields.update(path.root().to_string(), updated),
        })
    }

    /// New draft with a freshly selected file at `path`.
    pub fn set_file(&self, path: &FieldPath, blob: FileBlob) -> Result<Draft, AppError> {
        self.set_field(path, DraftValue::File(Attachment::Selected(blob)))
    }

    /// New draft with `item` appended to the list at `path`. A missing or null list starts empty.
    pub fn add_list_item(&self, path: &FieldPath, item: DraftValue) -> Result<Draft, AppError> {
        let mut items = match self.get(path) {
            Some(DraftValue::List(items)) => items.clone(),
            Some(DraftValue::Null) | None => Vector::new(),
            Some(_) => {
                return Err(AppError::InvalidPath(format!(
                    "'{}' is not a list field",
                    path
                )))
            }
        };
        items.push_back(item);

        if self.fields.contains_key(path.root()) || path.is_top_level() {
            self.set_field(path, DraftValue::List(items))
        } else {
            Err(unresolved(path))
        }
    }

    /// New draft with element `index` removed from the list at `path`; later elements shift down.
    pub fn remove_list_item(&self, path: &FieldPath, index: usize) -> Result<Draft, AppError> {
        let mut items = match self.get(path) {
            Some(DraftValue::List(items)) => items.clone(),
            _ => {
                return Err(AppError::InvalidPath(format!(
                    "'{}' is not a list field",
                    path
                )))
            }
        };
        if index >= items.len() {
            return Err(AppError::InvalidPath(format!(
                "Index {} out of bounds for '{}' (len {})",
                index,
                path,
                items.len()
            )));
        }
        items.remove(index);
        self.set_field(path, DraftValue::List(items))
    }

    /// Every newly selected blob with the path it sits at.
    pub fn selected_files(&self) -> Vec<(FieldPath, FileBlob)> {
        let mut out = Vec::new();
        for (name, value) in self.fields.iter() {
            value.collect_selected(FieldPath::field(name.clone()), &mut out);
        }
        out
    }

    pub fn has_selected_files(&self) -> bool {
        !self.selected_files().is_empty()
    }
}

fn as_stored_attachment(value: DraftValue) -> DraftValue {
    match value {
        DraftValue::Text(path) if !path.trim().is_empty() => {
            DraftValue::File(Attachment::Stored(path))
        }
        DraftValue::Text(_) => DraftValue::Null,
        other => other,
    }
}

fn unresolved(path: &FieldPath) -> AppError {
    AppError::InvalidPath(format!("Path '{}' does not resolve in the draft", path))
}

fn replace_at(
    current: &DraftValue,
    steps: &[Step],
    value: DraftValue,
    full: &FieldPath,
) -> Result<DraftValue, AppError> {
    let Some((step, rest)) = steps.split_first() else {
        return Ok(value);
    };

    match (step, current) {
        (Step::Key(k), DraftValue::Object(map)) => {
            let updated = match map.get(k) {
                Some(child) => replace_at(child, rest, value, full)?,
                None if rest.is_empty() => value,
                None => return Err(unresolved(full)),
            };
            Ok(DraftValue::Object(map.update(k.clone(), updated)))
        }
        (Step::Index(i), DraftValue::List(items)) => {
            let child = items.get(*i).ok_or_else(|| unresolved(full))?;
            let updated = replace_at(child, rest, value, full)?;
            Ok(DraftValue::List(items.update(*i, updated)))
        }
        _ => Err(unresolved(full)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn faq_draft() -> Draft {
        Draft::new([
            ("title", DraftValue::text("General")),
            ("img", DraftValue::Null),
            (
                "qa",
                DraftValue::list([
                    DraftValue::object([
                        ("question", DraftValue::text("Q1")),
                        ("answer", DraftValue::text("A1")),
                    ]),
                    DraftValue::object([
                        ("question", DraftValue::text("Q2")),
                        ("answer", DraftValue::text("A2")),
                    ]),
                ]),
            ),
        ])
    }

    #[test]
    fn test_set_field_leaves_prior_draft_untouched() {
        let d1 = faq_draft();
        let before = d1.clone();
        let path = FieldPath::field("qa").index(1).key("answer");

        let d2 = d1.set_field(&path, DraftValue::text("changed")).unwrap();

        assert_eq!(d1, before);
        assert_eq!(d1.get(&path), Some(&DraftValue::text("A2")));
        assert_eq!(d2.get(&path), Some(&DraftValue::text("changed")));
        // siblings preserved
        assert_eq!(
            d2.get(&FieldPath::field("qa").index(0).key("answer")),
            Some(&DraftValue::text("A1"))
        );
        assert_eq!(d2.field("title"), Some(&DraftValue::text("General")));
    }

    #[test]
    fn test_repeated_edits_do_not_alias_list_elements() {
        let d1 = faq_draft();
        let d2 = d1
            .set_field(&FieldPath::field("qa").index(0).key("question"), "first".into())
            .unwrap();
        let d3 = d2
            .set_field(&FieldPath::field("qa").index(1).key("question"), "second".into())
            .unwrap();

        let q = |d: &Draft, i: usize| {
            d.get(&FieldPath::field("qa").index(i).key("question"))
                .and_then(|v| v.as_text().map(str::to_string))
        };
        assert_eq!(q(&d2, 1).as_deref(), Some("Q2"));
        assert_eq!(q(&d3, 0).as_deref(), Some("first"));
        assert_eq!(q(&d3, 1).as_deref(), Some("second"));
    }

    #[test]
    fn test_set_field_rejects_out_of_range_index() {
        let d = faq_draft();
        let err = d
            .set_field(&FieldPath::field("qa").index(5).key("answer"), "x".into())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));

        let err = d
            .set_field(&FieldPath::field("missing").key("x"), "x".into())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));
    }

    #[test]
    fn test_add_and_remove_list_items_reindex() {
        let d = faq_draft();
        let qa = FieldPath::field("qa");
        let blank = DraftValue::object([
            ("question", DraftValue::text("")),
            ("answer", DraftValue::text("")),
        ]);

        let grown = d.add_list_item(&qa, blank.clone()).unwrap();
        assert_eq!(grown.get(&qa).and_then(|v| v.as_list()).map(|l| l.len()), Some(3));
        assert_eq!(d.get(&qa).and_then(|v| v.as_list()).map(|l| l.len()), Some(2));

        let shrunk = grown.remove_list_item(&qa, 0).unwrap();
        assert_eq!(
            shrunk.get(&qa.clone().index(0).key("question")),
            Some(&DraftValue::text("Q2"))
        );
        assert_eq!(shrunk.get(&qa.clone().index(1)), Some(&blank));

        assert!(shrunk.remove_list_item(&qa, 2).is_err());
    }

    #[test]
    fn test_add_list_item_to_nested_list() {
        let d = Draft::new([(
            "subservice",
            DraftValue::list([DraftValue::object([
                ("title", DraftValue::text("Web")),
                ("keyFeatures", DraftValue::list([DraftValue::text("Fast")])),
            ])]),
        )]);
        let features = FieldPath::field("subservice").index(0).key("keyFeatures");

        let d2 = d.add_list_item(&features, DraftValue::text("")).unwrap();
        let d3 = d2
            .set_field(&features.clone().index(1), DraftValue::text("Secure"))
            .unwrap();

        assert_eq!(
            d3.get(&features).unwrap().to_json(),
            json!(["Fast", "Secure"])
        );
    }

    #[test]
    fn test_seed_marks_stored_attachments() {
        let record = Record::from_value(json!({
            "_id": "abc",
            "title": "Why us",
            "img": "uploads/why.png",
            "exp": [
                { "icon": "uploads/a.svg", "title": "A" },
                { "icon": "", "title": "B" }
            ]
        }))
        .unwrap();
        let template = Draft::new([
            ("title", DraftValue::text("")),
            ("subtitle", DraftValue::text("")),
            ("img", DraftValue::Null),
        ]);
        let files = [FileField::top("img"), FileField::in_list_as("exp", "icon", "exp_icon")];

        let d = Draft::seed(&record, &template, &files, "_id");

        assert!(d.field("_id").is_none());
        assert_eq!(d.field("subtitle"), Some(&DraftValue::text("")));
        assert_eq!(
            d.field("img"),
            Some(&DraftValue::File(Attachment::Stored("uploads/why.png".into())))
        );
        assert_eq!(
            d.get(&FieldPath::field("exp").index(0).key("icon")),
            Some(&DraftValue::File(Attachment::Stored("uploads/a.svg".into())))
        );
        assert_eq!(
            d.get(&FieldPath::field("exp").index(1).key("icon")),
            Some(&DraftValue::Null)
        );
    }

    #[test]
    fn test_seed_marks_file_list_entries() {
        let record = Record::from_value(json!({
            "_id": "w1",
            "img": ["uploads/a.png", "", "uploads/b.png"]
        }))
        .unwrap();
        let template = Draft::new([("img", DraftValue::list([]))]);

        let d = Draft::seed(&record, &template, &[FileField::files("img")], "_id");

        assert_eq!(
            d.field("img"),
            Some(&DraftValue::list([
                DraftValue::File(Attachment::Stored("uploads/a.png".into())),
                DraftValue::Null,
                DraftValue::File(Attachment::Stored("uploads/b.png".into())),
            ]))
        );
    }

    #[test]
    fn test_part_names() {
        let exp_icon = FieldPath::field("exp").index(2).key("icon");
        let mission_icon = FieldPath::field("mission").index(1).key("icon");

        assert_eq!(
            FileField::in_list_as("exp", "icon", "exp_icon").part_name(&exp_icon),
            Some("exp_icon".to_string())
        );
        assert_eq!(
            FileField::in_list("mission", "icon").part_name(&mission_icon),
            Some("mission[1][icon]".to_string())
        );
        assert_eq!(
            FileField::files("img").part_name(&FieldPath::field("img").index(3)),
            Some("img".to_string())
        );
        assert_eq!(
            FileField::top("img").part_name(&FieldPath::field("img")),
            Some("img".to_string())
        );

        assert_eq!(FileField::top("img").part_name(&exp_icon), None);
        assert_eq!(
            FileField::in_list("exp", "title").part_name(&exp_icon),
            None
        );
    }

    #[test]
    fn test_selected_files_found_at_any_depth() {
        let d = faq_draft()
            .set_file(&FieldPath::field("img"), FileBlob::from_path("/tmp/cover.png"))
            .unwrap()
            .set_field(
                &FieldPath::field("qa").index(1).key("icon"),
                DraftValue::File(Attachment::Selected(FileBlob::from_path("/tmp/q.svg"))),
            )
            .unwrap();

        let files = d.selected_files();
        let keys: Vec<String> = files.iter().map(|(p, _)| p.form_key()).collect();
        assert_eq!(keys, vec!["img".to_string(), "qa[1][icon]".to_string()]);
        assert_eq!(files[0].1.file_name, "cover.png");
        assert!(d.has_selected_files());
        assert!(!faq_draft().has_selected_files());
    }
}
