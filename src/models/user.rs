//! User model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An employee account as the engines see it.
///
/// The engines only need identity, the display name used in notification
/// text, the reporting line, and whether the account is active (inactive
/// users are skipped when seeding leave balances).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: Uuid,
    /// The user's full display name.
    pub full_name: String,
    /// The user's manager, if they report to one.
    pub manager_id: Option<Uuid>,
    /// Whether the account is active.
    pub is_active: bool,
}

impl User {
    /// Returns true if the user reports to a manager.
    pub fn has_manager(&self) -> bool {
        self.manager_id.is_some()
    }
}
