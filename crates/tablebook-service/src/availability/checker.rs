//! Availability checker: which tables are committed for a date and window.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_core::types::{RestaurantId, TableId, TimeWindow, parse_date};
use tablebook_database::store::{BookingStore, RestaurantDirectory};
use tablebook_entity::booking::Booking;

/// A bulk availability question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    /// Restaurant to check.
    pub restaurant_id: RestaurantId,
    /// Calendar day.
    pub date: NaiveDate,
    /// Requested `[start, end)` window.
    pub window: TimeWindow,
    /// Candidate tables; `None` checks the whole floor plan.
    pub table_ids: Option<Vec<TableId>>,
}

impl AvailabilityQuery {
    /// Build a query from raw `YYYY-MM-DD` / `HH:MM` inputs.
    pub fn parse(
        restaurant_id: RestaurantId,
        date: &str,
        start: &str,
        end: &str,
        table_ids: Option<Vec<TableId>>,
    ) -> AppResult<Self> {
        Ok(Self {
            restaurant_id,
            date: parse_date("date", date)?,
            window: TimeWindow::parse(start, end)?,
            table_ids,
        })
    }
}

/// Availability of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableAvailability {
    /// Whether any pending or confirmed booking overlaps the window.
    pub occupied: bool,
    /// The overlapping windows, earliest first.
    pub conflicts: Vec<TimeWindow>,
}

/// Answer to an [`AvailabilityQuery`].
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityReport {
    /// Restaurant checked.
    pub restaurant_id: RestaurantId,
    /// Calendar day checked.
    pub date: NaiveDate,
    /// Window checked.
    pub window: TimeWindow,
    /// Per-table result, ordered by table id.
    pub tables: BTreeMap<TableId, TableAvailability>,
}

impl AvailabilityReport {
    /// Ids of the tables that are taken.
    pub fn occupied_tables(&self) -> Vec<TableId> {
        self.tables
            .iter()
            .filter(|(_, a)| a.occupied)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Whether a table is free; `None` if it was not part of the query.
    pub fn is_free(&self, table_id: TableId) -> Option<bool> {
        self.tables.get(&table_id).map(|a| !a.occupied)
    }
}

/// Windows of occupying bookings on `table_id` that overlap `window`.
///
/// `bookings` must already be restricted to a single date.
pub fn conflicting_windows(
    bookings: &[Booking],
    table_id: TableId,
    window: &TimeWindow,
) -> Vec<TimeWindow> {
    let mut windows: Vec<TimeWindow> = bookings
        .iter()
        .filter(|b| b.table_id == table_id && b.is_occupying())
        .map(Booking::window)
        .filter(|w| w.overlaps(window))
        .collect();
    windows.sort_by_key(|w| (w.start, w.end));
    windows
}

/// Read-only availability lookups over the booking store.
#[derive(Clone)]
pub struct AvailabilityChecker {
    bookings: Arc<dyn BookingStore>,
    directory: Arc<dyn RestaurantDirectory>,
}

impl std::fmt::Debug for AvailabilityChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityChecker").finish_non_exhaustive()
    }
}

impl AvailabilityChecker {
    /// Creates a new availability checker.
    pub fn new(bookings: Arc<dyn BookingStore>, directory: Arc<dyn RestaurantDirectory>) -> Self {
        Self {
            bookings,
            directory,
        }
    }

    /// Check every candidate table for the query's date and window.
    ///
    /// Fails with `NotFound` if the restaurant does not exist or a candidate
    /// table is not on its active floor plan.
    pub async fn check(&self, query: &AvailabilityQuery) -> AppResult<AvailabilityReport> {
        let floor = self.directory.get_table_ids(query.restaurant_id).await?;

        let candidates = match &query.table_ids {
            Some(requested) => {
                let mut ids = Vec::with_capacity(requested.len());
                for id in requested {
                    if !floor.contains(id) {
                        return Err(AppError::not_found(format!(
                            "Table {id} not found in restaurant {}",
                            query.restaurant_id
                        ))
                        .with_details(serde_json::json!({ "field": "table_id" })));
                    }
                    if !ids.contains(id) {
                        ids.push(*id);
                    }
                }
                ids
            }
            None => floor,
        };

        let occupying = self
            .bookings
            .find_occupying(query.restaurant_id, query.date, Some(&candidates))
            .await?;

        let tables: BTreeMap<TableId, TableAvailability> = candidates
            .into_iter()
            .map(|id| {
                let conflicts = conflicting_windows(&occupying, id, &query.window);
                let availability = TableAvailability {
                    occupied: !conflicts.is_empty(),
                    conflicts,
                };
                (id, availability)
            })
            .collect();

        debug!(
            restaurant_id = %query.restaurant_id,
            date = %query.date,
            window = %query.window,
            checked = tables.len(),
            occupied = tables.values().filter(|a| a.occupied).count(),
            "Availability checked"
        );

        Ok(AvailabilityReport {
            restaurant_id: query.restaurant_id,
            date: query.date,
            window: query.window,
            tables,
        })
    }

    /// Whether a single table is free for the slot.
    pub async fn is_table_free(
        &self,
        restaurant_id: RestaurantId,
        table_id: TableId,
        date: NaiveDate,
        window: TimeWindow,
    ) -> AppResult<bool> {
        let report = self
            .check(&AvailabilityQuery {
                restaurant_id,
                date,
                window,
                table_ids: Some(vec![table_id]),
            })
            .await?;
        Ok(report.is_free(table_id).unwrap_or(false))
    }

    /// Check a slot and fail with `Conflict` (carrying the overlapping
    /// windows) if the table is taken.
    pub async fn ensure_free(
        &self,
        restaurant_id: RestaurantId,
        table_id: TableId,
        date: NaiveDate,
        window: TimeWindow,
    ) -> AppResult<()> {
        let report = self
            .check(&AvailabilityQuery {
                restaurant_id,
                date,
                window,
                table_ids: Some(vec![table_id]),
            })
            .await?;

        match report.tables.get(&table_id) {
            Some(a) if a.occupied => Err(tablebook_database::store::slot_conflict(
                table_id,
                date,
                &window,
                &a.conflicts,
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, t};
    use proptest::prelude::*;
    use tablebook_core::error::ErrorKind;
    use tablebook_entity::booking::BookingStatus;

    #[tokio::test]
    async fn test_touching_windows_are_free() {
        let fx = Fixture::new();
        fx.seed(fx.tables[0], "18:00", "20:00", BookingStatus::Confirmed)
            .await;

        let checker = fx.checker();
        let report = checker
            .check(&fx.query("20:00", "22:00", Some(vec![fx.tables[0]])))
            .await
            .unwrap();
        assert_eq!(report.is_free(fx.tables[0]), Some(true));

        let report = checker
            .check(&fx.query("19:59", "22:00", Some(vec![fx.tables[0]])))
            .await
            .unwrap();
        assert_eq!(report.occupied_tables(), vec![fx.tables[0]]);
        assert_eq!(
            report.tables[&fx.tables[0]].conflicts,
            vec![TimeWindow::new(t("18:00"), t("20:00")).unwrap()]
        );
    }

    #[tokio::test]
    async fn test_terminal_bookings_never_block() {
        let fx = Fixture::new();
        fx.seed(fx.tables[0], "18:00", "20:00", BookingStatus::Cancelled)
            .await;
        fx.seed(fx.tables[0], "18:00", "20:00", BookingStatus::Completed)
            .await;

        let report = fx
            .checker()
            .check(&fx.query("18:00", "20:00", None))
            .await
            .unwrap();
        assert!(report.occupied_tables().is_empty());
        assert_eq!(report.tables.len(), fx.tables.len());
    }

    #[tokio::test]
    async fn test_bulk_lists_only_occupied() {
        let fx = Fixture::new();
        fx.seed(fx.tables[1], "19:00", "21:00", BookingStatus::Pending)
            .await;

        let report = fx
            .checker()
            .check(&fx.query("18:00", "20:00", None))
            .await
            .unwrap();
        assert_eq!(report.occupied_tables(), vec![fx.tables[1]]);
    }

    #[tokio::test]
    async fn test_unknown_table_and_restaurant_not_found() {
        let fx = Fixture::new();
        let checker = fx.checker();

        let err = checker
            .check(&fx.query("18:00", "20:00", Some(vec![TableId::new()])))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let mut query = fx.query("18:00", "20:00", None);
        query.restaurant_id = RestaurantId::new();
        let err = checker.check(&query).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        let rid = RestaurantId::new();
        let err = AvailabilityQuery::parse(rid, "2026-13-01", "18:00", "20:00", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = AvailabilityQuery::parse(rid, "2026-10-19", "18:00", "25:00", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    fn minute_window() -> impl Strategy<Value = (u32, u32)> {
        (0u32..1439).prop_flat_map(|start| (Just(start), (start + 1)..=1439))
    }

    fn to_window((start, end): (u32, u32)) -> TimeWindow {
        let at = |m: u32| chrono::NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap();
        TimeWindow::new(at(start), at(end)).unwrap()
    }

    proptest! {
        #[test]
        fn prop_flags_exactly_the_overlapping_windows(
            existing in proptest::collection::vec(minute_window(), 0..8),
            requested in minute_window(),
        ) {
            let table = TableId::new();
            let bookings: Vec<Booking> = existing
                .iter()
                .map(|&w| crate::testing::booking_at(table, to_window(w), BookingStatus::Confirmed))
                .collect();

            let found = conflicting_windows(&bookings, table, &to_window(requested));

            // Brute force over the minute grid: half-open intervals share a minute.
            let mut expected: Vec<TimeWindow> = existing
                .iter()
                .filter(|&&(s, e)| (s..e).any(|m| (requested.0..requested.1).contains(&m)))
                .map(|&w| to_window(w))
                .collect();
            expected.sort_by_key(|w| (w.start, w.end));

            prop_assert_eq!(found, expected);
        }
    }
}
