use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{AuditLogId, StaffId};

/// The kind of change an audit row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    Insert,
    Update,
    Delete,
}

impl AuditAction {
    /// The literal stored in the `action` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    /// Parse a stored column literal.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// One row of append-only change history.
///
/// The audited row is referenced loosely by `(table_name, record_id)` so
/// history survives deletion of the row it describes; only `staff_id` is
/// a real foreign key, nulled when the staff record goes away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Option<AuditLogId>,
    pub table_name: String,
    pub record_id: i64,
    pub action: AuditAction,

    /// Snapshot of the row before the change, as JSON.
    pub old_values: Option<serde_json::Value>,

    /// Snapshot of the row after the change, as JSON.
    pub new_values: Option<serde_json::Value>,
    pub staff_id: Option<StaffId>,
    pub logged_at: DateTime<Utc>,
}

impl AuditEntry {
    #[must_use]
    pub fn new(table_name: impl Into<String>, record_id: i64, action: AuditAction) -> Self {
        Self {
            id: None,
            table_name: table_name.into(),
            record_id,
            action,
            old_values: None,
            new_values: None,
            staff_id: None,
            logged_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_old_values(mut self, values: serde_json::Value) -> Self {
        self.old_values = Some(values);
        self
    }

    #[must_use]
    pub fn with_new_values(mut self, values: serde_json::Value) -> Self {
        self.new_values = Some(values);
        self
    }

    #[must_use]
    pub fn with_staff(mut self, staff_id: StaffId) -> Self {
        self.staff_id = Some(staff_id);
        self
    }
}
