//! Pre-submission checks.
//!
//! Presence only: rules run in declaration order and the first failure is reported.

use super::draft::{Attachment, Draft, DraftValue};
use super::path::FieldPath;
use crate::errors::AppError;

/// A single presence rule on a draft field.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Text must be non-blank; files must be stored or selected
    Required(FieldPath),
    /// List must hold at least one non-blank text entry
    NonEmptyList(FieldPath),
}

impl Rule {
    pub fn required(field: &str) -> Self {
        Rule::Required(FieldPath::field(field))
    }

    pub fn non_empty_list(field: &str) -> Self {
        Rule::NonEmptyList(FieldPath::field(field))
    }

    fn check(&self, draft: &Draft) -> Result<(), AppError> {
        match self {
            Rule::Required(path) => {
                let present = match draft.get(path) {
                    Some(DraftValue::Text(s)) => !s.trim().is_empty(),
                    Some(DraftValue::File(Attachment::Stored(p))) => !p.trim().is_empty(),
                    Some(DraftValue::File(Attachment::Selected(_))) => true,
                    Some(DraftValue::Null) | None => false,
                    Some(DraftValue::List(items)) => !items.is_empty(),
                    Some(_) => true,
                };
                if present {
                    Ok(())
                } else {
                    Err(AppError::validation(
                        path.to_string(),
                        format!("{} is required", path),
                    ))
                }
            }
            Rule::NonEmptyList(path) => {
                let has_entry = draft
                    .get(path)
                    .and_then(DraftValue::as_list)
                    .map(|items| {
                        items
                            .iter()
                            .any(|v| v.as_text().is_some_and(|s| !s.trim().is_empty()))
                    })
                    .unwrap_or(false);
                if has_entry {
                    Ok(())
                } else {
                    Err(AppError::validation(
                        path.to_string(),
                        format!("At least one {} entry is needed", path),
                    ))
                }
            }
        }
    }
}

/// Run `rules` in order and stop at the first failing field.
pub fn validate(draft: &Draft, rules: &[Rule]) -> Result<(), AppError> {
    for rule in rules {
        rule.check(draft)?;
    }
    Ok(())
}
