//! Typed addressing of draft fields.
//!
//! A path is a root field name followed by steps into nested objects and lists:
//! `qa[0].answer` is `field("qa").index(0).key("answer")`. The textual forms are only
//! parsed at the command-line boundary.

use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

/// One step below the root field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Field of a nested object
    Key(String),
    /// Element of a list
    Index(usize),
}

/// Address of a scalar, nested object field or list element inside a draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    root: String,
    steps: Vec<Step>,
}

impl FieldPath {
    /// Top-level field.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            root: name.into(),
            steps: Vec::new(),
        }
    }

    /// Descend into a nested object field.
    pub fn key(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::Key(name.into()));
        self
    }

    /// Descend into a list element.
    pub fn index(mut self, index: usize) -> Self {
        self.steps.push(Step::Index(index));
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_top_level(&self) -> bool {
        self.steps.is_empty()
    }

    /// Multipart part name in bracket notation, e.g. `exp[2][icon]`.
    pub fn form_key(&self) -> String {
        let mut key = self.root.clone();
        for step in &self.steps {
            match step {
                Step::Key(name) => {
                    key.push('[');
                    key.push_str(name);
                    key.push(']');
                }
                Step::Index(i) => {
                    key.push('[');
                    key.push_str(&i.to_string());
                    key.push(']');
                }
            }
        }
        key
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for step in &self.steps {
            match step {
                Step::Key(name) => write!(f, ".{}", name)?,
                Step::Index(i) => write!(f, "[{}]", i)?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = AppError;

    /// Accepts `title`, `qa[0].answer`, `exp.0.title` and `subservice[1].keyFeatures[2]`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| AppError::InvalidPath(format!("Invalid path '{}': {}", raw, why));

        let mut path: Option<FieldPath> = None;

        for segment in raw.trim().split('.') {
            if segment.is_empty() {
                return Err(invalid("empty segment"));
            }

            let (name, mut rest) = match segment.find('[') {
                Some(pos) => segment.split_at(pos),
                None => (segment, ""),
            };

            match path.as_mut() {
                None => {
                    if name.is_empty() || name.chars().all(|c| c.is_ascii_digit()) {
                        return Err(invalid("must start with a field name"));
                    }
                    path = Some(FieldPath::field(name));
                }
                Some(_) if name.is_empty() => {
                    return Err(invalid("index must follow a name"));
                }
                Some(p) => match name.parse::<usize>() {
                    Ok(i) => p.steps.push(Step::Index(i)),
                    Err(_) => p.steps.push(Step::Key(name.to_string())),
                },
            }

            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| invalid("unclosed '['"))?;
                let index = rest[1..close]
                    .parse::<usize>()
                    .map_err(|_| invalid("index must be a non-negative integer"))?;
                if let Some(p) = path.as_mut() {
                    p.steps.push(Step::Index(index));
                }
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(invalid("unexpected text after ']'"));
                }
            }
        }

        path.ok_or_else(|| invalid("empty path"))
    }
}
