//! Notification delivery boundary.
//!
//! Engines hand finished [`Notification`] messages to a [`NotificationSink`]
//! and move on: delivery is best-effort, and a sink failure must never fail
//! the business operation that produced the message. Engines therefore log a
//! warning on error instead of propagating it.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::models::Notification;

/// Error returned by a [`NotificationSink`] that could not accept a message.
#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(
    /// Description of the delivery failure.
    pub String,
);

/// Accepts notifications for asynchronous persistence and delivery.
pub trait NotificationSink: Send + Sync {
    /// Hands one message to the delivery layer.
    fn deliver(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// A [`NotificationSink`] that collects messages in memory.
///
/// Clones share the underlying buffer, so a test can keep one handle while
/// the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every message delivered so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("sink lock poisoned").clone()
    }
}

impl NotificationSink for MemorySink {
    fn deliver(&self, notification: Notification) -> Result<(), NotifyError> {
        self.sent.lock().expect("sink lock poisoned").push(notification);
        Ok(())
    }
}
