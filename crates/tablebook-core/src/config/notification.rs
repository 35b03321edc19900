//! Notification dispatch configuration.

use serde::{Deserialize, Serialize};

/// Settings for the background status-change notification dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Whether status-change notifications are dispatched at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Capacity of the in-process dispatch queue. Notices are dropped (and
    /// logged) when the queue is full.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_queue_capacity() -> usize {
    1024
}
