//! Submission pipeline: draft to wire request, then refresh and reset.

use serde_json::{Map, Value};

use crate::api::{ApiClient, FormPart, Payload};
use crate::errors::AppError;
use crate::form::{validate, Attachment, Draft, DraftValue, FileField, FormMode, FormState};
use crate::models::{Notifications, Record, Resource};
use crate::store::CollectionStore;

/// Whether the draft creates a record or patches an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMode {
    Add,
    Update { id: String },
}

impl SubmitMode {
    fn verb(&self) -> &'static str {
        match self {
            SubmitMode::Add => "Added",
            SubmitMode::Update { .. } => "Updated",
        }
    }
}

/// Top-level fields that go on the wire.
///
/// Add mode sends every field. Update mode sends fields that are set and differ from the
/// baseline the edit was seeded with; the backend leaves the rest unchanged.
fn fields_to_send<'a>(
    mode: &SubmitMode,
    draft: &'a Draft,
    baseline: Option<&Draft>,
) -> Vec<(&'a String, &'a DraftValue)> {
    draft
        .fields()
        .filter(|(name, value)| match mode {
            SubmitMode::Add => true,
            SubmitMode::Update { .. } => {
                !value.is_null() && baseline.and_then(|b| b.field(name)) != Some(*value)
            }
        })
        .collect()
}

/// Serialize a draft.
///
/// When any sent field carries a newly selected file the payload is multipart: scalars as
/// text parts, lists and objects as JSON-encoded text parts, and each selected blob as its
/// own part. Blobs are named by the declared [`FileField`] (`exp_icon`, repeated `img`) or
/// in bracket notation (`exp[0][icon]`) when no declaration covers them. A list of files is
/// never sent as JSON text: its stored paths go out as repeated text parts under the list's
/// name. Without a selected file the payload is JSON.
pub fn build_payload(
    mode: &SubmitMode,
    draft: &Draft,
    baseline: Option<&Draft>,
    id_field: &str,
    file_fields: &[FileField],
) -> Payload {
    let fields = fields_to_send(mode, draft, baseline);

    let mut files = Vec::new();
    for (name, value) in &fields {
        let single = Draft::new([(name.as_str(), (*value).clone())]);
        files.extend(single.selected_files());
    }

    if files.is_empty() {
        let mut map = Map::new();
        if let SubmitMode::Update { id } = mode {
            map.insert(id_field.to_string(), Value::String(id.clone()));
        }
        for (name, value) in fields {
            map.insert(name.clone(), value.to_json());
        }
        return Payload::Json(map);
    }

    let mut parts = Vec::new();
    if let SubmitMode::Update { id } = mode {
        parts.push(FormPart::Text {
            name: id_field.to_string(),
            value: id.clone(),
        });
    }

    for (name, value) in fields {
        if is_file_list(file_fields, name) {
            if let DraftValue::List(items) = value {
                for item in items {
                    if let DraftValue::File(Attachment::Stored(path)) = item {
                        parts.push(FormPart::Text {
                            name: name.clone(),
                            value: path.clone(),
                        });
                    }
                }
                continue;
            }
        }

        match value {
            DraftValue::File(Attachment::Selected(_)) => {}
            DraftValue::File(Attachment::Stored(path)) => parts.push(FormPart::Text {
                name: name.clone(),
                value: path.clone(),
            }),
            DraftValue::Text(s) => parts.push(FormPart::Text {
                name: name.clone(),
                value: s.clone(),
            }),
            DraftValue::Null => parts.push(FormPart::Text {
                name: name.clone(),
                value: String::new(),
            }),
            DraftValue::Bool(_)
            | DraftValue::Number(_)
            | DraftValue::List(_)
            | DraftValue::Object(_) => parts.push(FormPart::Text {
                name: name.clone(),
                value: value.to_json().to_string(),
            }),
        }
    }

    for (path, blob) in files {
        let name = file_fields
            .iter()
            .find_map(|f| f.part_name(&path))
            .unwrap_or_else(|| path.form_key());
        parts.push(FormPart::File { name, blob });
    }

    Payload::Multipart(parts)
}

fn is_file_list(file_fields: &[FileField], name: &str) -> bool {
    file_fields
        .iter()
        .any(|f| matches!(f, FileField::Files(list) if list == name))
}

/// Validate, send, and on success refresh the collection and close the form.
///
/// On any failure the form stays open with the draft intact and an error notification is
/// queued: the server's message when it sent one, a generic text otherwise. Nothing is
/// retried.
pub async fn submit(
    client: &ApiClient,
    resource: &Resource,
    form: &mut FormState,
    store: &mut CollectionStore,
    notifications: &mut Notifications,
) -> Result<Option<Record>, AppError> {
    let mode = match form.mode() {
        FormMode::Hidden => {
            return Err(AppError::InvalidState(
                "Cannot submit: no form is open".to_string(),
            ))
        }
        FormMode::Add => SubmitMode::Add,
        FormMode::Update { id } => SubmitMode::Update { id: id.clone() },
    };

    if let Err(e) = validate(form.draft(), &resource.rules) {
        tracing::info!(resource = resource.name, "validation failed: {}", e);
        notifications.error("Validation", e.user_message());
        return Err(e);
    }

    let payload = build_payload(
        &mode,
        form.draft(),
        form.baseline(),
        resource.id_field,
        &resource.file_fields,
    );

    let sent = match &mode {
        SubmitMode::Add => client.create(resource, &payload).await,
        SubmitMode::Update { id } => client.update(resource, id, &payload).await,
    };

    let record = match sent {
        Ok(record) => record,
        Err(e) => {
            tracing::error!(resource = resource.name, "Error submitting {}: {}", resource.label, e);
            notifications.error("Error", e.user_message());
            return Err(e);
        }
    };

    if let Err(e) = store.invalidate(client, resource).await {
        tracing::warn!(resource = resource.name, "refresh after submit failed: {}", e);
        notifications.error("Error", e.user_message());
    }

    form.close();
    notifications.success(format!("{} {} Successfully", resource.label, mode.verb()));

    Ok(record)
}
