//! Form state: typed field paths, copy-on-write drafts and pre-submission validation.

mod draft;
mod path;
mod rules;

pub use draft::*;
pub use path::*;
pub use rules::*;

use crate::errors::AppError;

/// What the form is doing right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Hidden,
    Add,
    Update { id: String },
}

/// Holds one draft and the mode it is edited in.
///
/// In update mode the draft seeded at `begin_update` is kept as the baseline so the
/// submission pipeline can send only what changed.
#[derive(Debug, Clone)]
pub struct FormState {
    mode: FormMode,
    template: Draft,
    draft: Draft,
    baseline: Option<Draft>,
}

impl FormState {
    pub fn new(template: Draft) -> Self {
        Self {
            mode: FormMode::Hidden,
            draft: template.clone(),
            template,
            baseline: None,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Hidden
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn baseline(&self) -> Option<&Draft> {
        self.baseline.as_ref()
    }

    /// Open an empty add form.
    pub fn begin_add(&mut self) {
        self.mode = FormMode::Add;
        self.draft = self.template.clone();
        self.baseline = None;
    }

    /// Open an edit form seeded from `seeded`.
    pub fn begin_update(&mut self, id: impl Into<String>, seeded: Draft) {
        self.mode = FormMode::Update { id: id.into() };
        self.baseline = Some(seeded.clone());
        self.draft = seeded;
    }

    /// Close the form and reset the draft to the template.
    pub fn close(&mut self) {
        self.mode = FormMode::Hidden;
        self.draft = self.template.clone();
        self.baseline = None;
    }

    fn ensure_open(&self) -> Result<(), AppError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(AppError::InvalidState("No form is open".to_string()))
        }
    }

    pub fn set_field(&mut self, path: &FieldPath, value: DraftValue) -> Result<(), AppError> {
        self.ensure_open()?;
        self.draft = self.draft.set_field(path, value)?;
        Ok(())
    }

    pub fn set_file(&mut self, path: &FieldPath, blob: FileBlob) -> Result<(), AppError> {
        self.ensure_open()?;
        self.draft = self.draft.set_file(path, blob)?;
        Ok(())
    }

    pub fn add_list_item(
        &mut self,
        path: &FieldPath,
        item: DraftValue,
    ) -> Result<(), AppError> {
        self.ensure_open()?;
        self.draft = self.draft.add_list_item(path, item)?;
        Ok(())
    }

    pub fn remove_list_item(&mut self, path: &FieldPath, index: usize) -> Result<(), AppError> {
        self.ensure_open()?;
        self.draft = self.draft.remove_list_item(path, index)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_resets_to_template() {
        let template = Draft::new([("title", DraftValue::text(""))]);
        let mut form = FormState::new(template.clone());

        form.begin_add();
        form.set_field(&FieldPath::field("title"), "Draft".into()).unwrap();
        assert_eq!(form.draft().field("title"), Some(&DraftValue::text("Draft")));

        form.close();
        assert_eq!(form.mode(), &FormMode::Hidden);
        assert_eq!(form.draft(), &template);
    }

    #[test]
    fn test_edits_require_open_form() {
        let mut form = FormState::new(Draft::default());
        let err = form
            .set_field(&FieldPath::field("title"), "x".into())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[test]
    fn test_update_keeps_baseline() {
        let seeded = Draft::new([("title", DraftValue::text("Old"))]);
        let mut form = FormState::new(Draft::default());

        form.begin_update("42", seeded.clone());
        form.set_field(&FieldPath::field("title"), "New".into()).unwrap();

        assert_eq!(form.baseline(), Some(&seeded));
        assert_eq!(form.mode(), &FormMode::Update { id: "42".into() });
    }
}
