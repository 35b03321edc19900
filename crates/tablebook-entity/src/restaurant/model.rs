//! Restaurant entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tablebook_core::types::{RestaurantId, UserId};

use super::hours::OperatingHours;

/// A restaurant accepting bookings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    /// Unique restaurant identifier.
    pub id: RestaurantId,
    /// The user who owns the restaurant.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Per-guest rate overriding the platform default.
    pub base_rate: Option<Decimal>,
    /// Weekly service schedule.
    #[sqlx(json)]
    pub operating_hours: OperatingHours,
    /// When the restaurant was created.
    pub created_at: DateTime<Utc>,
    /// When the restaurant was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    /// Check whether the given user owns this restaurant.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}
