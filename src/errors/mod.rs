//! Error handling module for the admin client.
//!
//! Every failure a feature view can run into is one `AppError` variant. None of them is
//! fatal: the controller logs the error, surfaces a notification and stays usable.

use serde::Deserialize;

/// Error codes as constants to avoid stringly-typed errors.
#[allow(dead_code)]
pub mod codes {
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UNEXPECTED_SHAPE: &str = "UNEXPECTED_SHAPE";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const UNSUPPORTED: &str = "UNSUPPORTED";
    pub const INVALID_PATH: &str = "INVALID_PATH";
    pub const INVALID_STATE: &str = "INVALID_STATE";
    pub const IO_ERROR: &str = "IO_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Text shown to the user when the server gave no message of its own.
pub const GENERIC_FAILURE: &str = "Something went wrong!";

/// Application error type.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// The request never reached the server or no response came back
    Transport(String),
    /// Non-2xx status, with the server's own message when it sent one
    Server { status: u16, message: Option<String> },
    /// Client-side validation failure on a draft field
    Validation { field: String, message: String },
    /// Response body did not have the shape the resource declares
    UnexpectedShape(String),
    /// No record with the given id in the collection
    NotFound(String),
    /// The resource does not offer this operation
    Unsupported(String),
    /// A field path did not resolve against the draft
    InvalidPath(String),
    /// Confirmation gate or form used out of order
    InvalidState(String),
    /// Reading a selected attachment failed
    Io(String),
    /// Bad configuration value
    Config(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Transport(_) => codes::TRANSPORT_ERROR,
            AppError::Server { .. } => codes::SERVER_ERROR,
            AppError::Validation { .. } => codes::VALIDATION_ERROR,
            AppError::UnexpectedShape(_) => codes::UNEXPECTED_SHAPE,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Unsupported(_) => codes::UNSUPPORTED,
            AppError::InvalidPath(_) => codes::INVALID_PATH,
            AppError::InvalidState(_) => codes::INVALID_STATE,
            AppError::Io(_) => codes::IO_ERROR,
            AppError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Transport(msg) => msg.clone(),
            AppError::Server { status, message } => match message {
                Some(msg) => format!("HTTP {}: {}", status, msg),
                None => format!("HTTP {}", status),
            },
            AppError::Validation { message, .. } => message.clone(),
            AppError::UnexpectedShape(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Unsupported(msg) => msg.clone(),
            AppError::InvalidPath(msg) => msg.clone(),
            AppError::InvalidState(msg) => msg.clone(),
            AppError::Io(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
        }
    }

    /// Text for a user-facing notification.
    ///
    /// Server messages are passed through verbatim and validation messages name the field;
    /// everything else collapses to [`GENERIC_FAILURE`].
    pub fn user_message(&self) -> String {
        match self {
            AppError::Server {
                message: Some(msg), ..
            } => msg.clone(),
            AppError::Validation { message, .. } => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Transport error: {:?}", err);
        AppError::Transport(format!("Transport error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::UnexpectedShape(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("IO error: {:?}", err);
        AppError::Io(format!("IO error: {}", err))
    }
}

/// Error body the backend may send with a non-2xx status.
///
/// Only the human-readable `message` is consumed; there is no structured code taxonomy.
#[derive(Debug, Default, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ServerErrorBody {
    /// Extract the message from a raw response body, tolerating non-JSON bodies.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ServerErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_passes_server_text_through() {
        let err = AppError::Server {
            status: 400,
            message: Some("Title already exists".to_string()),
        };
        assert_eq!(err.user_message(), "Title already exists");
        assert_eq!(err.error_code(), codes::SERVER_ERROR);
    }

    #[test]
    fn test_user_message_falls_back_to_generic() {
        let err = AppError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert_eq!(
            AppError::Transport("connection refused".into()).user_message(),
            GENERIC_FAILURE
        );
    }

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(
            ServerErrorBody::message_from(r#"{"message":"Invalid image"}"#),
            Some("Invalid image".to_string())
        );
        assert_eq!(ServerErrorBody::message_from(r#"{"message":"  "}"#), None);
        assert_eq!(ServerErrorBody::message_from("<html>502</html>"), None);
        assert_eq!(ServerErrorBody::message_from(""), None);
    }

    #[test]
    fn test_display_includes_code() {
        let err = AppError::validation("title", "title is required");
        assert_eq!(err.to_string(), "VALIDATION_ERROR: title is required");
    }
}
