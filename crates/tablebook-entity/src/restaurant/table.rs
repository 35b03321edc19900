//! Dining table entity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tablebook_core::types::{RestaurantId, TableId};

/// A table placed on a restaurant's floor plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DiningTable {
    /// Unique table identifier.
    pub id: TableId,
    /// Owning restaurant.
    pub restaurant_id: RestaurantId,
    /// Label shown to staff ("T4", "Patio 2").
    pub label: String,
    /// Seats at the table.
    pub capacity: i32,
    /// Whether the table is on the active floor plan.
    pub is_active: bool,
}
