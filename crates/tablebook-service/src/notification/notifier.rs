//! Notification delivery seam.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use tablebook_core::result::AppResult;
use tablebook_core::types::{BookingId, RestaurantId, UserId};
use tablebook_entity::booking::{Booking, BookingStatus};

/// A booking status change to tell the customer about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeNotice {
    /// The booking.
    pub booking_id: BookingId,
    /// Human-readable reference.
    pub reference: String,
    /// Restaurant of the booking.
    pub restaurant_id: RestaurantId,
    /// Customer to notify.
    pub customer_id: UserId,
    /// Customer's name.
    pub customer_name: String,
    /// Customer's contact email.
    pub customer_email: String,
    /// Reserved day.
    pub booking_date: NaiveDate,
    /// Reserved start time.
    pub start_time: NaiveTime,
    /// Status before the change.
    pub previous_status: BookingStatus,
    /// Status after the change.
    pub new_status: BookingStatus,
    /// When the change was committed.
    pub occurred_at: DateTime<Utc>,
}

impl StatusChangeNotice {
    /// Build a notice from the committed booking.
    pub fn from_booking(booking: &Booking, previous_status: BookingStatus) -> Self {
        Self {
            booking_id: booking.id,
            reference: booking.reference.clone(),
            restaurant_id: booking.restaurant_id,
            customer_id: booking.customer_id,
            customer_name: booking.customer.customer_name.clone(),
            customer_email: booking.customer.customer_email.clone(),
            booking_date: booking.booking_date,
            start_time: booking.start_time,
            previous_status,
            new_status: booking.status,
            occurred_at: booking.updated_at,
        }
    }
}

/// Delivers a notice to the customer's contact channel.
#[async_trait]
pub trait StatusNotifier: Send + Sync + 'static {
    /// Deliver one notice.
    async fn notify_status_change(&self, notice: &StatusChangeNotice) -> AppResult<()>;
}

/// Notifier that records each notice as a structured log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl StatusNotifier for LogNotifier {
    async fn notify_status_change(&self, notice: &StatusChangeNotice) -> AppResult<()> {
        info!(
            booking_id = %notice.booking_id,
            reference = %notice.reference,
            customer_email = %notice.customer_email,
            previous_status = %notice.previous_status,
            new_status = %notice.new_status,
            "Booking status notification"
        );
        Ok(())
    }
}
