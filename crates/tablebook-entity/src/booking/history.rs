//! Append-only booking history log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::BookingStatus;
use crate::actor::ActorRole;

/// Kind of lifecycle event recorded in a booking's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    /// The booking was created.
    Created,
    /// The booking status changed.
    Modified,
    /// The payment status changed.
    Payment,
}

/// A single lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// What happened.
    pub action: HistoryAction,
    /// Role of the actor who caused the event.
    pub actor_role: ActorRole,
    /// Identifier of the actor who caused the event.
    pub actor_id: Uuid,
    /// Status before the event (absent on creation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<BookingStatus>,
    /// Status after the event.
    pub new_status: BookingStatus,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Free-form context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl HistoryEntry {
    /// Two entries describe the same event when action, timestamp and
    /// details agree.
    pub fn same_event(&self, other: &HistoryEntry) -> bool {
        self.action == other.action
            && self.timestamp == other.timestamp
            && self.details == other.details
    }
}

/// Ordered history of a booking. Entries are never edited or reordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingHistory(Vec<HistoryEntry>);

impl BookingHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry unless an identical event is already recorded.
    ///
    /// Returns `true` if the entry was appended.
    pub fn append(&mut self, entry: HistoryEntry) -> bool {
        if self.0.iter().any(|existing| existing.same_event(&entry)) {
            return false;
        }
        self.0.push(entry);
        true
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.0.last()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
