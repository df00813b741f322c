//! Feature controller: one per resource view.
//!
//! Owns the collection store, the form, the delete gate and the notification queue for a
//! single resource, and wires them to a shared [`ApiClient`]. Everything is plain `&mut self`
//! state; dropping the controller drops all of it.

use std::time::Duration;

use chrono::Utc;

use crate::api::ApiClient;
use crate::confirm::{self, Confirm, ConfirmGate, DeleteOutcome, GateState, Prompt};
use crate::errors::AppError;
use crate::form::{Draft, DraftValue, FieldPath, FileBlob, FormMode, FormState};
use crate::models::{Notification, Notifications, Record, Resource};
use crate::search::Facet;
use crate::store::{CollectionStore, LoadOutcome};
use crate::submit;

pub struct FeatureController {
    client: ApiClient,
    resource: Resource,
    store: CollectionStore,
    form: FormState,
    gate: ConfirmGate,
    notifications: Notifications,
}

impl FeatureController {
    pub fn new(client: ApiClient, resource: Resource, notify_ttl: Duration) -> Self {
        Self {
            store: CollectionStore::new(&resource),
            form: FormState::new(resource.template.clone()),
            gate: ConfirmGate::new(),
            notifications: Notifications::new(notify_ttl),
            client,
            resource,
        }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    // Collection

    /// Fetch the list. A failure keeps what was loaded before.
    pub async fn load(&mut self) -> Result<LoadOutcome, AppError> {
        self.store.load(&self.client, &self.resource).await
    }

    pub fn search(&mut self, query: &str) {
        self.store.apply_filter(query);
    }

    pub fn set_facet(&mut self, facet: Option<Facet>) {
        self.store.set_facet(facet);
    }

    /// Working copy, after search and facet.
    pub fn records(&self) -> &[Record] {
        self.store.records()
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    // Form

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn draft(&self) -> &Draft {
        self.form.draft()
    }

    pub fn begin_add(&mut self) -> Result<(), AppError> {
        if !self.resource.capabilities.create {
            return Err(AppError::Unsupported(format!(
                "{} does not support create",
                self.resource.label
            )));
        }
        self.form.begin_add();
        Ok(())
    }

    /// Open the edit form seeded from the loaded record with `id`.
    pub fn begin_edit(&mut self, id: &str) -> Result<(), AppError> {
        if !self.resource.capabilities.update {
            return Err(AppError::Unsupported(format!(
                "{} does not support update",
                self.resource.label
            )));
        }
        let record = self
            .store
            .find(id)
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", self.resource.label, id)))?;

        let seeded = Draft::seed(
            record,
            &self.resource.template,
            &self.resource.file_fields,
            self.resource.id_field,
        );
        self.form.begin_update(id, seeded);
        Ok(())
    }

    pub fn set_field(&mut self, path: &FieldPath, value: DraftValue) -> Result<(), AppError> {
        self.form.set_field(path, value)
    }

    pub fn set_file(&mut self, path: &FieldPath, blob: FileBlob) -> Result<(), AppError> {
        self.form.set_file(path, blob)
    }

    pub fn add_list_item(&mut self, path: &FieldPath, item: DraftValue) -> Result<(), AppError> {
        self.form.add_list_item(path, item)
    }

    pub fn remove_list_item(&mut self, path: &FieldPath, index: usize) -> Result<(), AppError> {
        self.form.remove_list_item(path, index)
    }

    /// Validate and send the draft. On success the list is re-fetched and the form closed.
    pub async fn submit(&mut self) -> Result<Option<Record>, AppError> {
        submit::submit(
            &self.client,
            &self.resource,
            &mut self.form,
            &mut self.store,
            &mut self.notifications,
        )
        .await
    }

    pub fn close_form(&mut self) {
        if self.form.mode() != &FormMode::Hidden {
            tracing::debug!(resource = self.resource.name, "form closed");
        }
        self.form.close();
    }

    // Delete

    pub fn gate_state(&self) -> &GateState {
        self.gate.state()
    }

    /// Start a delete and return the prompt to show the user.
    pub fn request_delete(&mut self, id: &str) -> Result<Prompt, AppError> {
        if !self.resource.capabilities.delete {
            return Err(AppError::Unsupported(format!(
                "{} does not support delete",
                self.resource.label
            )));
        }
        self.gate.request(id)
    }

    pub fn cancel_delete(&mut self) -> Result<(), AppError> {
        self.gate.cancel()
    }

    /// The user affirmed the pending prompt.
    pub async fn confirm_delete(&mut self) -> Result<(), AppError> {
        confirm::delete_confirmed(
            &mut self.gate,
            &self.client,
            &self.resource,
            &mut self.store,
            &mut self.notifications,
        )
        .await
    }

    /// Prompt through `confirmer` and delete only when it says yes.
    pub async fn confirm_and_delete(
        &mut self,
        id: &str,
        confirmer: &mut dyn Confirm,
    ) -> Result<DeleteOutcome, AppError> {
        confirm::confirm_and_delete(
            &mut self.gate,
            confirmer,
            &self.client,
            &self.resource,
            &mut self.store,
            &mut self.notifications,
            id,
        )
        .await
    }

    // Notifications

    /// Notifications still visible now.
    pub fn notifications(&mut self) -> Vec<Notification> {
        self.notifications.active(Utc::now())
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn controller(resource: Resource) -> FeatureController {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        FeatureController::new(client, resource, Duration::from_millis(1500))
    }

    #[test]
    fn test_begin_edit_unknown_id() {
        let mut c = controller(catalog::team());
        let err = c.begin_edit("missing").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!c.form().is_open());
    }

    #[test]
    fn test_capabilities_are_enforced() {
        let mut inbound = controller(catalog::contact_us());
        assert!(matches!(inbound.begin_add(), Err(AppError::Unsupported(_))));
        assert!(matches!(inbound.begin_edit("1"), Err(AppError::Unsupported(_))));

        let mut faq = controller(catalog::faq());
        assert!(matches!(faq.request_delete("1"), Err(AppError::Unsupported(_))));
        assert_eq!(faq.gate_state(), &GateState::Idle);
    }

    #[test]
    fn test_add_form_starts_from_template() {
        let mut c = controller(catalog::faq());
        c.begin_add().unwrap();
        assert_eq!(c.form().mode(), &FormMode::Add);
        assert_eq!(c.draft(), &catalog::faq().template);

        c.add_list_item(
            &FieldPath::field("qa"),
            DraftValue::object([("question", DraftValue::text("")), ("answer", DraftValue::text(""))]),
        )
        .unwrap();
        c.remove_list_item(&FieldPath::field("qa"), 0).unwrap();
        assert_eq!(
            c.draft()
                .field("qa")
                .and_then(DraftValue::as_list)
                .map(|l| l.len()),
            Some(1)
        );

        c.close_form();
        assert!(!c.form().is_open());
    }

    #[tokio::test]
    async fn test_submit_with_invalid_draft_notifies_and_keeps_form() {
        let mut c = controller(catalog::faq());
        c.begin_add().unwrap();

        let err = c.submit().await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(c.form().is_open());
        let last = c.last_notification().unwrap();
        assert_eq!(last.text.as_deref(), Some("title is required"));
    }
}
