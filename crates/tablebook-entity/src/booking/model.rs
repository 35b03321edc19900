//! Booking entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tablebook_core::types::{BookingId, RestaurantId, TableId, TimeWindow, UserId};

use super::history::BookingHistory;
use super::status::{BookingStatus, PaymentStatus};

/// Contact details of the party that booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CustomerInfo {
    /// Name the table is held under.
    pub customer_name: String,
    /// Contact email; notifications go here.
    pub customer_email: String,
    /// Optional phone number.
    pub customer_phone: Option<String>,
}

/// Fee computed at booking time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FeeSnapshot {
    /// Amount charged.
    pub fee: Decimal,
    /// Fee before any popularity markup.
    pub base_fee: Decimal,
    /// Whether the popularity markup was applied.
    pub markup_applied: bool,
    /// Whether the popularity ranking was unavailable and the base fee used.
    pub pricing_degraded: bool,
}

/// A table reservation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Internal identifier.
    pub id: BookingId,
    /// Human-readable reference code.
    pub reference: String,
    /// Restaurant the table belongs to.
    pub restaurant_id: RestaurantId,
    /// Customer who owns the booking.
    pub customer_id: UserId,
    /// Reserved table.
    pub table_id: TableId,
    /// Calendar day of the reservation.
    pub booking_date: NaiveDate,
    /// Inclusive start time.
    pub start_time: NaiveTime,
    /// Exclusive end time.
    pub end_time: NaiveTime,
    /// Party size.
    pub guest_count: i32,
    /// Contact details.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub customer: CustomerInfo,
    /// Pricing snapshot.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub pricing: FeeSnapshot,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Payment-provider reference, once known.
    pub payment_reference: Option<String>,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Lifecycle events, oldest first.
    #[sqlx(json)]
    pub history: BookingHistory,
    /// Free-text requests from the customer.
    pub special_requests: Option<String>,
    /// Optimistic-concurrency version, bumped on every write.
    #[serde(default, skip_serializing)]
    pub version: i64,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// The reserved `[start, end)` window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Whether this booking currently holds its slot.
    pub fn is_occupying(&self) -> bool {
        self.status.is_occupying()
    }

    /// Whether this booking conflicts with a candidate slot.
    pub fn conflicts_with(&self, table_id: TableId, date: NaiveDate, window: &TimeWindow) -> bool {
        self.is_occupying()
            && self.table_id == table_id
            && self.booking_date == date
            && self.window().overlaps(window)
    }

    /// Case-insensitive match against customer name, email or reference.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.customer.customer_name.to_lowercase().contains(&needle)
            || self.customer.customer_email.to_lowercase().contains(&needle)
            || self.reference.to_lowercase().contains(&needle)
    }
}
