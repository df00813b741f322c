//! Transient user-facing notifications.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

/// One notification. Success notices expire; errors stay until drained.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: Level,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub raised_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Queue owned by a feature controller and drained by whatever renders it.
#[derive(Debug, Clone)]
pub struct Notifications {
    ttl: Duration,
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            queue: VecDeque::new(),
        }
    }

    pub fn success(&mut self, title: impl Into<String>) {
        let title = title.into();
        tracing::info!(%title, "notify success");

        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl));
        self.queue.push_back(Notification {
            level: Level::Success,
            title,
            text: None,
            raised_at: now,
            expires_at,
        });
    }

    pub fn error(&mut self, title: impl Into<String>, text: impl Into<String>) {
        let title = title.into();
        let text = text.into();
        tracing::warn!(%title, %text, "notify error");

        self.queue.push_back(Notification {
            level: Level::Error,
            title,
            text: Some(text),
            raised_at: Utc::now(),
            expires_at: None,
        });
    }

    /// Notifications still visible at `now`; expired ones are dropped.
    pub fn active(&mut self, now: DateTime<Utc>) -> Vec<Notification> {
        self.queue.retain(|n| !n.is_expired(now));
        self.queue.iter().cloned().collect()
    }

    /// Take everything queued, expired or not.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.queue.back()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_expires_error_does_not() {
        let mut n = Notifications::new(Duration::from_millis(1500));
        n.success("FAQ Added Successfully");
        n.error("Error", "Something went wrong!");

        let later = Utc::now() + chrono::Duration::seconds(5);
        let active = n.active(later);

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].level, Level::Error);
        assert_eq!(active[0].text.as_deref(), Some("Something went wrong!"));
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut n = Notifications::new(Duration::from_millis(1500));
        n.success("one");
        n.success("two");
        assert_eq!(n.last().map(|x| x.title.as_str()), Some("two"));

        let drained = n.drain();
        assert_eq!(drained.len(), 2);
        assert!(n.is_empty());
    }
}
