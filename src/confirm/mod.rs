//! Confirmation gate around deletes.
//!
//! `Idle -> Confirming -> Idle` when the user backs out, `Idle -> Confirming -> Deleting -> Idle`
//! when they affirm. Any other transition is refused and the state is left alone.

use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{Notifications, Resource};
use crate::store::CollectionStore;

/// Text shown when asking for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub id: String,
    pub title: String,
    pub text: String,
    pub confirm_label: String,
}

impl Prompt {
    fn for_delete(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: "Are you sure?".to_string(),
            text: "You won't be able to revert this!".to_string(),
            confirm_label: "Yes, delete it!".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Confirming { id: String },
    Deleting { id: String },
}

/// Answers a [`Prompt`]. `true` means go ahead.
pub trait Confirm {
    fn confirm(&mut self, prompt: &Prompt) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Prompt) -> bool,
{
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        self(prompt)
    }
}

/// Result of a gated delete that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ConfirmGate {
    state: GateState,
}

impl Default for ConfirmGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Idle,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Idle -> Confirming. Returns the prompt to show.
    pub fn request(&mut self, id: &str) -> Result<Prompt, AppError> {
        match &self.state {
            GateState::Idle => {
                self.state = GateState::Confirming { id: id.to_string() };
                Ok(Prompt::for_delete(id))
            }
            other => Err(invalid("request", other)),
        }
    }

    /// Confirming -> Idle.
    pub fn cancel(&mut self) -> Result<(), AppError> {
        match &self.state {
            GateState::Confirming { id } => {
                tracing::debug!(%id, "delete cancelled");
                self.state = GateState::Idle;
                Ok(())
            }
            other => Err(invalid("cancel", other)),
        }
    }

    /// Confirming -> Deleting. Returns the id to delete.
    pub fn confirm(&mut self) -> Result<String, AppError> {
        match &self.state {
            GateState::Confirming { id } => {
                let id = id.clone();
                self.state = GateState::Deleting { id: id.clone() };
                Ok(id)
            }
            other => Err(invalid("confirm", other)),
        }
    }

    /// Deleting -> Idle, whatever the request's outcome.
    pub fn finish(&mut self) -> Result<(), AppError> {
        match &self.state {
            GateState::Deleting { .. } => {
                self.state = GateState::Idle;
                Ok(())
            }
            other => Err(invalid("finish", other)),
        }
    }
}

fn invalid(transition: &str, state: &GateState) -> AppError {
    AppError::InvalidState(format!("Cannot {} a delete while {:?}", transition, state))
}

fn ensure_deletable(resource: &Resource) -> Result<(), AppError> {
    if resource.capabilities.delete {
        Ok(())
    } else {
        Err(AppError::Unsupported(format!(
            "{} does not support delete",
            resource.label
        )))
    }
}

/// Send DELETE for the id the gate is confirming, then refresh the collection.
///
/// The gate must be in `Confirming`; it is back in `Idle` afterwards whether or not the
/// request succeeded. A failed delete leaves the collection as it was and queues an error
/// notification.
pub async fn delete_confirmed(
    gate: &mut ConfirmGate,
    client: &ApiClient,
    resource: &Resource,
    store: &mut CollectionStore,
    notifications: &mut Notifications,
) -> Result<(), AppError> {
    ensure_deletable(resource)?;

    let id = gate.confirm()?;
    let result = client.delete(resource, &id).await;
    gate.finish()?;

    if let Err(e) = result {
        tracing::error!(resource = resource.name, %id, "Error deleting {}: {}", resource.label, e);
        notifications.error("Error!", e.user_message());
        return Err(e);
    }

    if let Err(e) = store.invalidate(client, resource).await {
        tracing::warn!(resource = resource.name, "refresh after delete failed: {}", e);
        notifications.error("Error!", e.user_message());
    }

    notifications.success(format!("{} Deleted Successfully", resource.label));
    Ok(())
}

/// Ask, and only on an affirmative answer delete and refresh. A declined prompt sends
/// nothing.
pub async fn confirm_and_delete(
    gate: &mut ConfirmGate,
    confirmer: &mut dyn Confirm,
    client: &ApiClient,
    resource: &Resource,
    store: &mut CollectionStore,
    notifications: &mut Notifications,
    id: &str,
) -> Result<DeleteOutcome, AppError> {
    ensure_deletable(resource)?;

    let prompt = gate.request(id)?;
    if !confirmer.confirm(&prompt) {
        gate.cancel()?;
        return Ok(DeleteOutcome::Cancelled);
    }

    delete_confirmed(gate, client, resource, store, notifications).await?;
    Ok(DeleteOutcome::Deleted)
}
