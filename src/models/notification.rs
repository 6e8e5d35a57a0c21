//! Notification message model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of a notification, used by the delivery layer for routing and
/// display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A user exceeded the daily break allowance; sent to their manager.
    BreakViolation,
    /// A session was force-closed by the 10-hour sweep; sent to the user.
    AutoLogout,
    /// A leave request was approved.
    LeaveApproved,
    /// A leave request was rejected.
    LeaveRejected,
    /// Comp-off credit was added to the user's balance.
    CompOffAdded,
    /// General informational notice (e.g. a new leave request awaiting a
    /// manager's review).
    General,
}

/// A message produced by an engine for asynchronous delivery.
///
/// Engines only construct these; persistence and delivery belong to the
/// [`crate::notify::NotificationSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The user the message is addressed to.
    pub recipient: Uuid,
    /// Message kind.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Full message text.
    pub message: String,
    /// Optional reference the delivery layer can turn into a link
    /// (e.g. `"manager/leave-approvals?request_id=<id>"`).
    pub action_ref: Option<String>,
}
