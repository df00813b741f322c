//! Request bodies for create and update calls.

use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::form::FileBlob;

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, blob: FileBlob },
}

/// Wire body of a create or update request.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Map<String, Value>),
    Multipart(Vec<FormPart>),
}

impl Payload {
    /// Names of the fields carried, in order. File parts included.
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Payload::Json(map) => map.keys().map(String::as_str).collect(),
            Payload::Multipart(parts) => parts
                .iter()
                .map(|p| match p {
                    FormPart::Text { name, .. } | FormPart::File { name, .. } => name.as_str(),
                })
                .collect(),
        }
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Payload::Multipart(_))
    }

    /// Text value of a field, for JSON strings and multipart text parts.
    pub fn text(&self, name: &str) -> Option<String> {
        match self {
            Payload::Json(map) => map.get(name).map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            Payload::Multipart(parts) => parts.iter().find_map(|p| match p {
                FormPart::Text { name: n, value } if n == name => Some(value.clone()),
                _ => None,
            }),
        }
    }
}

/// Read selected files and assemble a reqwest multipart form.
pub(crate) async fn build_form(parts: &[FormPart]) -> Result<Form, AppError> {
    let mut form = Form::new();

    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File { name, blob } => {
                let bytes = tokio::fs::read(&blob.path).await.map_err(|e| {
                    AppError::Io(format!("Failed to read {}: {}", blob.path.display(), e))
                })?;
                tracing::debug!(part = %name, file = %blob.file_name, size = bytes.len(), "attaching file");

                let file_part = Part::bytes(bytes)
                    .file_name(blob.file_name.clone())
                    .mime_str(content_type_for(&blob.file_name))?;
                form.part(name.clone(), file_part)
            }
        };
    }

    Ok(form)
}

/// Content type from the file extension; the backend only cares about images and PDFs.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("logo.PNG"), "image/png");
        assert_eq!(content_type_for("cv.pdf"), "application/pdf");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[test]
    fn test_text_lookup() {
        let payload = Payload::Multipart(vec![
            FormPart::Text {
                name: "title".into(),
                value: "FAQ".into(),
            },
            FormPart::File {
                name: "img".into(),
                blob: FileBlob::from_path("/tmp/a.png"),
            },
        ]);
        assert_eq!(payload.text("title").as_deref(), Some("FAQ"));
        assert_eq!(payload.text("img"), None);
        assert_eq!(payload.field_names(), vec!["title", "img"]);
    }

    #[tokio::test]
    async fn test_build_form_reports_missing_file() {
        let parts = vec![FormPart::File {
            name: "image".into(),
            blob: FileBlob::from_path("/definitely/not/here.png"),
        }];
        let err = build_form(&parts).await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
