//! Presentation helpers shared by every list view.

use serde_json::Value;

use crate::models::{Record, Resource};

/// Ellipsis appended to shortened text.
pub const ELLIPSIS: &str = "...";

/// First `limit` characters of `text` followed by `...`, or `text` itself when it fits.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// `<base-url>/<stored-path>` with exactly one slash between them.
pub fn asset_url(base_url: &str, stored_path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        stored_path.trim_start_matches('/')
    )
}

/// One-line summary of a record: the resource's summary field, truncated.
pub fn summary(resource: &Resource, record: &Record) -> String {
    let Some((field, limit)) = resource.summary else {
        return String::new();
    };
    match record.get(field) {
        Some(Value::String(s)) => truncate(s, limit),
        Some(Value::Null) | None => String::new(),
        Some(other) => truncate(&other.to_string(), limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Draft;
    use serde_json::json;

    #[test]
    fn test_truncate_long_text() {
        let text = "x".repeat(200);
        let short = truncate(&text, 100);
        assert_eq!(short.len(), 103);
        assert!(short.ends_with(ELLIPSIS));
        assert_eq!(&short[..100], &text[..100]);
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("short", 100), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("", 10), "");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("ሰላም ዓለም", 3), "ሰላም...");
    }

    #[test]
    fn test_asset_url_single_slash() {
        assert_eq!(
            asset_url("http://api.test/", "/uploads/a.png"),
            "http://api.test/uploads/a.png"
        );
        assert_eq!(
            asset_url("http://api.test", "uploads/a.png"),
            "http://api.test/uploads/a.png"
        );
    }

    #[test]
    fn test_summary_uses_resource_field() {
        let resource =
            Resource::new("blog", "Blog", Draft::default()).with_summary("description", 5);
        let record = Record::from_value(json!({ "description": "Long description" })).unwrap();
        assert_eq!(summary(&resource, &record), "Long ...");

        let plain = Resource::new("team", "Team", Draft::default());
        assert_eq!(summary(&plain, &record), "");
    }
}
