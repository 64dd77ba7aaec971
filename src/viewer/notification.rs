//! Transient, dismissible failure notifications.

use std::time::Duration;

use web_time::Instant;

use crate::fetch::FailureKind;

/// A message for the user about a document that could not be shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: FailureKind,
    pub message: String,
    created_at: Instant,
    ttl: Duration,
}

impl Notification {
    pub fn new(kind: FailureKind, message: impl Into<String>, ttl: Duration) -> Self {
        Self::at(kind, message, ttl, Instant::now())
    }

    /// Create with an explicit creation time.
    pub fn at(kind: FailureKind, message: impl Into<String>, ttl: Duration, created_at: Instant) -> Self {
        Self {
            kind,
            message: message.into(),
            created_at,
            ttl,
        }
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Whether the notification has outlived its display time at `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.ttl
    }
}
