//! In-memory booking store using a Tokio mutex.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::debug;

use tablebook_core::result::AppResult;
use tablebook_core::types::{BookingId, RestaurantId, TableId};
use tablebook_entity::booking::{Booking, BookingStatus};

use crate::store::{
    BookingFilter, BookingScope, BookingStore, TableUsage, slot_conflict, sort_chronologically,
};

/// In-memory booking store. The single mutex makes check-and-insert atomic.
///
/// Suitable for single-node deployments only.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookingStore {
    bookings: Arc<Mutex<HashMap<BookingId, Booking>>>,
}

impl MemoryBookingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored bookings.
    pub async fn len(&self) -> usize {
        self.bookings.lock().await.len()
    }

    /// Whether the store holds no bookings.
    pub async fn is_empty(&self) -> bool {
        self.bookings.lock().await.is_empty()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        Ok(self.bookings.lock().await.get(&id).cloned())
    }

    async fn find_occupying(
        &self,
        restaurant_id: RestaurantId,
        date: NaiveDate,
        table_ids: Option<&[TableId]>,
    ) -> AppResult<Vec<Booking>> {
        let bookings = self.bookings.lock().await;
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| {
                b.restaurant_id == restaurant_id
                    && b.booking_date == date
                    && b.is_occupying()
                    && table_ids.is_none_or(|ids| ids.contains(&b.table_id))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.table_id
                .cmp(&b.table_id)
                .then(a.start_time.cmp(&b.start_time))
        });
        Ok(found)
    }

    async fn insert_if_available(&self, booking: &Booking) -> AppResult<Booking> {
        let mut bookings = self.bookings.lock().await;
        let window = booking.window();

        let mut conflicts: Vec<_> = bookings
            .values()
            .filter(|b| b.conflicts_with(booking.table_id, booking.booking_date, &window))
            .map(Booking::window)
            .collect();

        if !conflicts.is_empty() {
            conflicts.sort_by_key(|w| w.start);
            debug!(table_id = %booking.table_id, "Slot already occupied at insert");
            return Err(slot_conflict(
                booking.table_id,
                booking.booking_date,
                &window,
                &conflicts,
            ));
        }

        bookings.insert(booking.id, booking.clone());
        Ok(booking.clone())
    }

    async fn update_versioned(
        &self,
        booking: &Booking,
        expected_version: i64,
    ) -> AppResult<Option<Booking>> {
        let mut bookings = self.bookings.lock().await;
        let Some(stored) = bookings.get_mut(&booking.id) else {
            return Ok(None);
        };
        if stored.version != expected_version {
            return Ok(None);
        }

        stored.status = booking.status;
        stored.payment_status = booking.payment_status;
        stored.payment_reference = booking.payment_reference.clone();
        stored.history = booking.history.clone();
        stored.special_requests = booking.special_requests.clone();
        stored.updated_at = booking.updated_at;
        stored.version = expected_version + 1;
        Ok(Some(stored.clone()))
    }

    async fn delete_terminal(&self, id: BookingId, expected_version: i64) -> AppResult<bool> {
        let mut bookings = self.bookings.lock().await;
        let removable = bookings
            .get(&id)
            .is_some_and(|b| b.version == expected_version && b.status.is_terminal());
        if removable {
            bookings.remove(&id);
        }
        Ok(removable)
    }

    async fn query(&self, scope: BookingScope, filter: &BookingFilter) -> AppResult<Vec<Booking>> {
        let bookings = self.bookings.lock().await;
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| match scope {
                BookingScope::Restaurant(id) => b.restaurant_id == id,
                BookingScope::Customer(id) => b.customer_id == id,
            })
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        sort_chronologically(&mut found);
        Ok(found)
    }

    async fn table_usage(
        &self,
        restaurant_id: RestaurantId,
        statuses: &[BookingStatus],
    ) -> AppResult<Vec<TableUsage>> {
        let bookings = self.bookings.lock().await;
        let mut counts: HashMap<TableId, i64> = HashMap::new();
        for b in bookings
            .values()
            .filter(|b| b.restaurant_id == restaurant_id && statuses.contains(&b.status))
        {
            *counts.entry(b.table_id).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(table_id, bookings)| TableUsage { table_id, bookings })
            .collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
