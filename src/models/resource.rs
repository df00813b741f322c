//! Resource descriptor: everything a feature view needs to know about one REST collection.

use crate::form::{Draft, FileField, Rule};

/// How the list endpoint wraps its array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// The body is the array itself
    Bare,
    /// The array sits under a `data` property
    DataEnvelope,
}

/// Operations the backend offers for a resource. Listing is always available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Capabilities {
    pub const CRUD: Capabilities = Capabilities {
        create: true,
        update: true,
        delete: true,
    };
    /// Add and edit, no delete
    pub const CREATE_UPDATE: Capabilities = Capabilities {
        create: true,
        update: true,
        delete: false,
    };
    /// Inbound submissions: read and delete
    pub const READ_DELETE: Capabilities = Capabilities {
        create: false,
        update: false,
        delete: true,
    };
    /// Listed only
    pub const READ_ONLY: Capabilities = Capabilities {
        create: false,
        update: false,
        delete: false,
    };
    /// Single-document pages edited in place
    pub const READ_UPDATE: Capabilities = Capabilities {
        create: false,
        update: true,
        delete: false,
    };
}

/// Description of one REST collection.
#[derive(Debug, Clone)]
pub struct Resource {
    /// Catalog key, also used on the command line
    pub name: &'static str,
    /// Path segment under `/api/`
    pub endpoint: &'static str,
    /// Human label for notifications
    pub label: &'static str,
    pub id_field: &'static str,
    pub list_shape: ListShape,
    pub capabilities: Capabilities,
    /// Empty draft the add form starts from
    pub template: Draft,
    pub file_fields: Vec<FileField>,
    pub rules: Vec<Rule>,
    /// Also search strings nested in lists and objects
    pub deep_search: bool,
    /// Field shown truncated in summaries, with its limit in characters
    pub summary: Option<(&'static str, usize)>,
}

impl Resource {
    /// Minimal descriptor with the backend's defaults: `_id`, bare list, full CRUD.
    pub fn new(name: &'static str, label: &'static str, template: Draft) -> Self {
        Self {
            name,
            endpoint: name,
            label,
            id_field: "_id",
            list_shape: ListShape::Bare,
            capabilities: Capabilities::CRUD,
            template,
            file_fields: Vec::new(),
            rules: Vec::new(),
            deep_search: false,
            summary: None,
        }
    }

    pub fn list_path(&self) -> String {
        format!("/api/{}/", self.endpoint)
    }

    pub fn with_files(mut self, files: Vec<FileField>) -> Self {
        self.file_fields = files;
        self
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_list_shape(mut self, shape: ListShape) -> Self {
        self.list_shape = shape;
        self
    }

    pub fn with_deep_search(mut self) -> Self {
        self.deep_search = true;
        self
    }

    pub fn with_summary(mut self, field: &'static str, limit: usize) -> Self {
        self.summary = Some((field, limit));
        self
    }
}
