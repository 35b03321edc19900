//! Booking and payment status enumerations.
//!
//! The booking state machine:
//!
//! ```text
//! pending ──> confirmed ──> completed
//!    │            │
//!    └────────────┴──> cancelled
//! ```
//!
//! `cancelled` and `completed` are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tablebook_core::AppError;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Requested, awaiting confirmation.
    Pending,
    /// Confirmed by the restaurant.
    Confirmed,
    /// Cancelled by the customer or restaurant.
    Cancelled,
    /// The guests have dined.
    Completed,
}

impl BookingStatus {
    /// Every status, in state-machine order.
    pub const ALL: [BookingStatus; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Cancelled,
        Self::Completed,
    ];

    /// Whether `next` is directly reachable from this status.
    ///
    /// A transition to the same status is not a state-machine edge; callers
    /// treat it as a no-op before consulting this.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
                | (Self::Confirmed, Self::Cancelled)
        )
    }

    /// Check if the booking is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Whether a booking in this status holds its table slot.
    pub fn is_occupying(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether entering this status notifies the customer.
    pub fn notifies_customer(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(AppError::invalid_field(
                "status",
                format!(
                    "Invalid booking status: '{s}'. Expected one of: pending, confirmed, cancelled, completed"
                ),
            )),
        }
    }
}

/// Payment state of a booking's fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing has been collected yet.
    #[default]
    Unpaid,
    /// The fee was collected.
    Paid,
    /// The payment attempt failed.
    Failed,
}

impl PaymentStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            _ => Err(AppError::invalid_field(
                "payment_status",
                format!("Invalid payment status: '{s}'. Expected one of: unpaid, paid, failed"),
            )),
        }
    }
}
