//! Booking admission and lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Booking lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// How many times a status transition re-reads the booking after losing
    /// an optimistic-concurrency race before giving up with a conflict.
    #[serde(default = "default_max_transition_retries")]
    pub max_transition_retries: u32,
    /// Prefix of the human-readable booking reference (e.g. `RSV-7KQ2M9XD`).
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String,
    /// Largest party size accepted for a single booking.
    #[serde(default = "default_max_guest_count")]
    pub max_guest_count: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_transition_retries: default_max_transition_retries(),
            reference_prefix: default_reference_prefix(),
            max_guest_count: default_max_guest_count(),
        }
    }
}

fn default_max_transition_retries() -> u32 {
    3
}

fn default_reference_prefix() -> String {
    "RSV".to_string()
}

fn default_max_guest_count() -> u32 {
    50
}
