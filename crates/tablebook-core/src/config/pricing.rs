//! Fee calculation configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Booking fee settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Default per-guest rate, used when a restaurant has no rate of its own.
    #[serde(default = "default_base_rate")]
    pub base_rate: Decimal,
    /// Number of most-booked tables that receive the popularity markup.
    #[serde(default = "default_top_tables")]
    pub top_tables: usize,
    /// Multiplier applied to the base fee of a popular table.
    #[serde(default = "default_markup_factor")]
    pub markup_factor: Decimal,
    /// Booking statuses counted when ranking table popularity.
    ///
    /// Defaults to every status, cancelled bookings included.
    #[serde(default = "default_popularity_statuses")]
    pub popularity_statuses: Vec<String>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_rate: default_base_rate(),
            top_tables: default_top_tables(),
            markup_factor: default_markup_factor(),
            popularity_statuses: default_popularity_statuses(),
        }
    }
}

fn default_base_rate() -> Decimal {
    Decimal::TEN
}

fn default_top_tables() -> usize {
    3
}

fn default_markup_factor() -> Decimal {
    // 1.10
    Decimal::new(110, 2)
}

fn default_popularity_statuses() -> Vec<String> {
    ["pending", "confirmed", "cancelled", "completed"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
