//! Persistence ports consumed by the booking services.
//!
//! Two implementations are provided for each port:
//! - PostgreSQL (see [`crate::repositories`])
//! - In-memory (see [`crate::memory`])

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_core::types::{BookingId, RestaurantId, TableId, TimeWindow, UserId};
use tablebook_entity::booking::{Booking, BookingStatus};
use tablebook_entity::restaurant::{DiningTable, OperatingHours, Restaurant};

/// Whose bookings a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingScope {
    /// All bookings of one restaurant.
    Restaurant(RestaurantId),
    /// All bookings owned by one customer.
    Customer(UserId),
}

/// Optional filters for booking listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    /// Only bookings in this status.
    pub status: Option<BookingStatus>,
    /// Earliest booking date, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Latest booking date, inclusive.
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring of customer name, email or reference.
    pub search: Option<String>,
}

impl BookingFilter {
    /// Whether a booking passes every filter that is set.
    pub fn matches(&self, booking: &Booking) -> bool {
        if self.status.is_some_and(|s| s != booking.status) {
            return false;
        }
        if self.date_from.is_some_and(|from| booking.booking_date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| booking.booking_date > to) {
            return false;
        }
        match &self.search {
            Some(needle) => booking.matches_search(needle),
            None => true,
        }
    }
}

/// Historical booking count of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableUsage {
    /// The table.
    pub table_id: TableId,
    /// Number of bookings ever made for it, within the requested statuses.
    pub bookings: i64,
}

/// Storage for booking records.
///
/// Implementations must make [`insert_if_available`](Self::insert_if_available)
/// atomic with respect to concurrent inserts for the same table and date,
/// and must reject [`update_versioned`](Self::update_versioned) writes whose
/// expected version is stale.
#[async_trait]
pub trait BookingStore: Send + Sync + 'static {
    /// Fetch a booking by id.
    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>>;

    /// Pending or confirmed bookings of a restaurant on a date, optionally
    /// limited to some tables.
    async fn find_occupying(
        &self,
        restaurant_id: RestaurantId,
        date: NaiveDate,
        table_ids: Option<&[TableId]>,
    ) -> AppResult<Vec<Booking>>;

    /// Insert a booking unless an occupying booking on the same table and
    /// date overlaps its window. A lost race surfaces as `Conflict`.
    async fn insert_if_available(&self, booking: &Booking) -> AppResult<Booking>;

    /// Persist the mutable fields of `booking` if the stored version still
    /// equals `expected_version`. Returns `None` when the version is stale.
    async fn update_versioned(
        &self,
        booking: &Booking,
        expected_version: i64,
    ) -> AppResult<Option<Booking>>;

    /// Delete a terminal booking at `expected_version`. Returns `false` when
    /// the row changed or is no longer terminal.
    async fn delete_terminal(&self, id: BookingId, expected_version: i64) -> AppResult<bool>;

    /// Bookings in scope matching the filter, ordered by date then start time.
    async fn query(&self, scope: BookingScope, filter: &BookingFilter) -> AppResult<Vec<Booking>>;

    /// Per-table booking counts for a restaurant over the given statuses.
    async fn table_usage(
        &self,
        restaurant_id: RestaurantId,
        statuses: &[BookingStatus],
    ) -> AppResult<Vec<TableUsage>>;

    /// Check that the store backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Read-only view of restaurants and their floor plans.
#[async_trait]
pub trait RestaurantDirectory: Send + Sync + 'static {
    /// Fetch a restaurant by id.
    async fn find_restaurant(&self, id: RestaurantId) -> AppResult<Option<Restaurant>>;

    /// Tables on the restaurant's active floor plan.
    async fn list_tables(&self, restaurant_id: RestaurantId) -> AppResult<Vec<DiningTable>>;

    /// Fetch a restaurant, failing with `NotFound` when it does not exist.
    async fn get_restaurant(&self, id: RestaurantId) -> AppResult<Restaurant> {
        self.find_restaurant(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Restaurant {id} not found")))
    }

    /// Ids of the tables reachable from the active floor plan.
    async fn get_table_ids(&self, restaurant_id: RestaurantId) -> AppResult<Vec<TableId>> {
        self.get_restaurant(restaurant_id).await?;
        Ok(self
            .list_tables(restaurant_id)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect())
    }

    /// Weekly schedule of a restaurant.
    async fn get_operating_hours(&self, restaurant_id: RestaurantId) -> AppResult<OperatingHours> {
        Ok(self.get_restaurant(restaurant_id).await?.operating_hours)
    }

    /// Owner of a restaurant.
    async fn get_owner_id(&self, restaurant_id: RestaurantId) -> AppResult<UserId> {
        Ok(self.get_restaurant(restaurant_id).await?.owner_id)
    }
}

/// Build the `Conflict` error returned when a slot is taken.
pub fn slot_conflict(
    table_id: TableId,
    date: NaiveDate,
    requested: &TimeWindow,
    conflicting: &[TimeWindow],
) -> AppError {
    let windows: Vec<_> = conflicting
        .iter()
        .map(|w| {
            json!({
                "start_time": w.start.format("%H:%M").to_string(),
                "end_time": w.end.format("%H:%M").to_string(),
            })
        })
        .collect();

    AppError::conflict(format!(
        "Table {table_id} is no longer available on {date} for {requested}"
    ))
    .with_details(json!({
        "table_id": table_id,
        "date": date,
        "requested": {
            "start_time": requested.start.format("%H:%M").to_string(),
            "end_time": requested.end.format("%H:%M").to_string(),
        },
        "conflicts": windows,
    }))
}

/// Sort bookings by date, then start time, then creation.
pub(crate) fn sort_chronologically(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        a.booking_date
            .cmp(&b.booking_date)
            .then(a.start_time.cmp(&b.start_time))
            .then(a.created_at.cmp(&b.created_at))
    });
}
