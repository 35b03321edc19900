//! Actor role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of the authenticated caller, as supplied by the identity layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// A diner who books tables.
    Customer,
    /// The owner of one or more restaurants.
    RestaurantOwner,
    /// Platform administrator; bypasses ownership checks.
    Admin,
    /// Internal automation (payment webhooks, schedulers).
    System,
}

impl ActorRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::RestaurantOwner => "restaurant_owner",
            Self::Admin => "admin",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActorRole {
    type Err = tablebook_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "restaurant_owner" | "owner" => Ok(Self::RestaurantOwner),
            "admin" => Ok(Self::Admin),
            "system" => Ok(Self::System),
            _ => Err(tablebook_core::AppError::validation(format!(
                "Invalid actor role: '{s}'. Expected one of: customer, restaurant_owner, admin, system"
            ))),
        }
    }
}
