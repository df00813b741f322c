//! Configuration module for the admin client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

use crate::errors::AppError;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Origin of the REST backend, without trailing slash
    pub base_url: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Plain text or JSON log lines
    pub log_format: LogFormat,
    /// How long a success notification stays visible
    pub notify_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            notify_ttl: Duration::from_millis(1500),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let base_url = match env::var("CMS_BASE_URL") {
            Ok(raw) => normalize_base_url(&raw)?,
            Err(_) => defaults.base_url,
        };

        let log_level = env::var("CMS_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_format = match env::var("CMS_LOG_FORMAT") {
            Ok(raw) => match raw.to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                other => {
                    return Err(AppError::Config(format!(
                        "Invalid CMS_LOG_FORMAT '{}', expected text or json",
                        other
                    )))
                }
            },
            Err(_) => defaults.log_format,
        };

        let notify_ttl = match env::var("CMS_NOTIFY_TTL_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| AppError::Config(format!("Invalid CMS_NOTIFY_TTL_MS '{}'", raw)))?,
            Err(_) => defaults.notify_ttl,
        };

        Ok(Self {
            base_url,
            log_level,
            log_format,
            notify_ttl,
        })
    }
}

/// Validate a backend origin and strip trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| AppError::Config(format!("Invalid CMS_BASE_URL '{}': {}", raw, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        scheme => Err(AppError::Config(format!(
            "Unsupported scheme '{}' in CMS_BASE_URL",
            scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("CMS_BASE_URL");
        env::remove_var("CMS_LOG_LEVEL");
        env::remove_var("CMS_LOG_FORMAT");
        env::remove_var("CMS_NOTIFY_TTL_MS");

        let config = Config::from_env().unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.notify_ttl, Duration::from_millis(1500));
    }

    #[test]
    fn test_base_url_normalization() {
        assert_eq!(
            normalize_base_url("https://cms.example.com/").unwrap(),
            "https://cms.example.com"
        );
        assert_eq!(
            normalize_base_url(" http://localhost:5000// ").unwrap(),
            "http://localhost:5000"
        );
        assert!(matches!(
            normalize_base_url("ftp://example.com"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(AppError::Config(_))
        ));
    }
}
