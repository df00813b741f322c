//! REST client for the content backend.
//!
//! Every resource follows the same contract: GET and POST on `/api/<resource>/`, PUT and
//! DELETE on `/api/<resource>/<id>`. No timeout is configured; failures surface only through
//! the transport's own errors.

mod payload;

pub use payload::*;

use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;

use crate::errors::{AppError, ServerErrorBody};
use crate::models::{json_kind, ListShape, Record, Resource};

/// HTTP client bound to one backend origin. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of one record. The id is a single percent-encoded path segment.
    pub fn item_url(&self, resource: &Resource, id: &str) -> Result<String, AppError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Config(format!("Invalid base URL '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("Base URL '{}' cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(["api", resource.endpoint, id]);
        Ok(url.into())
    }

    /// GET /api/<resource>/ - List all records.
    pub async fn list(&self, resource: &Resource) -> Result<Vec<Record>, AppError> {
        let url = self.url(&resource.list_path());
        tracing::debug!(resource = resource.name, %url, "list");

        let body = self.send(self.http.get(&url)).await?;
        decode_list(resource.list_shape, &body)
    }

    /// POST /api/<resource>/ - Create a record.
    pub async fn create(
        &self,
        resource: &Resource,
        payload: &Payload,
    ) -> Result<Option<Record>, AppError> {
        if !resource.capabilities.create {
            return Err(unsupported(resource, "create"));
        }
        let url = self.url(&resource.list_path());
        tracing::debug!(resource = resource.name, %url, fields = ?payload.field_names(), "create");

        let request = self.with_body(self.http.post(&url), payload).await?;
        let body = self.send(request).await?;
        Ok(decode_record(&body))
    }

    /// PUT /api/<resource>/<id> - Partially update a record.
    pub async fn update(
        &self,
        resource: &Resource,
        id: &str,
        payload: &Payload,
    ) -> Result<Option<Record>, AppError> {
        if !resource.capabilities.update {
            return Err(unsupported(resource, "update"));
        }
        let url = self.item_url(resource, id)?;
        tracing::debug!(resource = resource.name, %url, fields = ?payload.field_names(), "update");

        let request = self.with_body(self.http.put(&url), payload).await?;
        let body = self.send(request).await?;
        Ok(decode_record(&body))
    }

    /// DELETE /api/<resource>/<id> - Delete a record.
    pub async fn delete(&self, resource: &Resource, id: &str) -> Result<(), AppError> {
        if !resource.capabilities.delete {
            return Err(unsupported(resource, "delete"));
        }
        let url = self.item_url(resource, id)?;
        tracing::debug!(resource = resource.name, %url, "delete");

        self.send(self.http.delete(&url)).await?;
        Ok(())
    }

    /// Absolute URL of a server-stored file path.
    pub fn asset_url(&self, stored_path: &str) -> String {
        crate::display::asset_url(&self.base_url, stored_path)
    }

    async fn with_body(
        &self,
        request: RequestBuilder,
        payload: &Payload,
    ) -> Result<RequestBuilder, AppError> {
        Ok(match payload {
            Payload::Json(map) => request.json(map),
            Payload::Multipart(parts) => request.multipart(build_form(parts).await?),
        })
    }

    /// Send and return the body text of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String, AppError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            let message = ServerErrorBody::message_from(&body);
            tracing::warn!(status = status.as_u16(), ?message, "server rejected request");
            Err(AppError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn unsupported(resource: &Resource, operation: &str) -> AppError {
    AppError::Unsupported(format!(
        "{} does not support {}",
        resource.label, operation
    ))
}

/// Decode a list body in the shape the resource declares.
///
/// An empty body or `null` is an empty list. A body in the other shape is an error rather
/// than being normalized.
pub fn decode_list(shape: ListShape, body: &str) -> Result<Vec<Record>, AppError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(body)?;
    let items = match (shape, value) {
        (_, Value::Null) => return Ok(Vec::new()),
        (ListShape::Bare, Value::Array(items)) => items,
        (ListShape::DataEnvelope, Value::Object(mut map)) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) => return Ok(Vec::new()),
            Some(other) => {
                return Err(AppError::UnexpectedShape(format!(
                    "Expected 'data' to be an array, got {}",
                    json_kind(&other)
                )))
            }
            None => {
                return Err(AppError::UnexpectedShape(
                    "Expected an object with a 'data' array".to_string(),
                ))
            }
        },
        (ListShape::Bare, other) => {
            return Err(AppError::UnexpectedShape(format!(
                "Expected a JSON array, got {}",
                json_kind(&other)
            )))
        }
        (ListShape::DataEnvelope, other) => {
            return Err(AppError::UnexpectedShape(format!(
                "Expected an object with a 'data' array, got {}",
                json_kind(&other)
            )))
        }
    };

    items.into_iter().map(Record::from_value).collect()
}

/// Best-effort decode of a single-record response, bare or under `data`.
fn decode_record(body: &str) -> Option<Record> {
    let value: Value = serde_json::from_str(body).ok()?;
    let value = match value {
        Value::Object(mut map) if matches!(map.get("data"), Some(Value::Object(_))) => {
            map.remove("data")?
        }
        other => other,
    };
    Record::from_value(value).ok()
}
