//! Booking repository implementation.
//!
//! Admission is a single `INSERT ... SELECT ... WHERE NOT EXISTS` so the
//! overlap check and the write happen in one statement. The
//! `bookings_no_overlap` exclusion constraint catches the remaining race
//! between two statements that both saw a free slot.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use tablebook_core::error::{AppError, ErrorKind};
use tablebook_core::result::AppResult;
use tablebook_core::types::{BookingId, RestaurantId, TableId, TimeWindow};
use tablebook_entity::booking::{Booking, BookingStatus};

use crate::store::{BookingFilter, BookingScope, BookingStore, TableUsage, slot_conflict};

/// SQLSTATE raised by an exclusion constraint.
const EXCLUSION_VIOLATION: &str = "23P01";

const INSERT_IF_FREE: &str = "\
    INSERT INTO bookings ( \
        id, reference, restaurant_id, customer_id, table_id, booking_date, \
        start_time, end_time, guest_count, customer_name, customer_email, \
        customer_phone, fee, base_fee, markup_applied, pricing_degraded, \
        payment_status, payment_reference, status, history, special_requests, \
        version, created_at, updated_at \
    ) \
    SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
           $16, $17, $18, $19, $20, $21, $22, $23, $24 \
    WHERE NOT EXISTS ( \
        SELECT 1 FROM bookings \
        WHERE table_id = $5 AND booking_date = $6 \
          AND status IN ('pending', 'confirmed') \
          AND start_time < $8 AND $7 < end_time \
    ) \
    RETURNING *";

/// Repository for booking admission, versioned updates and listings.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Windows of occupying bookings that overlap `window` on a table and date.
    async fn conflicting_windows(
        &self,
        table_id: TableId,
        date: NaiveDate,
        window: &TimeWindow,
    ) -> AppResult<Vec<TimeWindow>> {
        let rows = sqlx::query_as::<_, (NaiveTime, NaiveTime)>(
            "SELECT start_time, end_time FROM bookings \
             WHERE table_id = $1 AND booking_date = $2 \
               AND status IN ('pending', 'confirmed') \
               AND start_time < $4 AND $3 < end_time \
             ORDER BY start_time",
        )
        .bind(table_id)
        .bind(date)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load conflicting bookings", e)
        })?;

        Ok(rows
            .into_iter()
            .map(|(start, end)| TimeWindow { start, end })
            .collect())
    }

    async fn conflict_for(&self, booking: &Booking) -> AppError {
        let window = booking.window();
        match self
            .conflicting_windows(booking.table_id, booking.booking_date, &window)
            .await
        {
            Ok(windows) => slot_conflict(booking.table_id, booking.booking_date, &window, &windows),
            Err(e) => e,
        }
    }
}

fn is_exclusion_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(EXCLUSION_VIOLATION),
        _ => false,
    }
}

/// Escape `%`, `_` and `\` for use inside an ILIKE pattern.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find booking", e))
    }

    async fn find_occupying(
        &self,
        restaurant_id: RestaurantId,
        date: NaiveDate,
        table_ids: Option<&[TableId]>,
    ) -> AppResult<Vec<Booking>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT * FROM bookings WHERE status IN ('pending', 'confirmed') AND restaurant_id = ",
        );
        qb.push_bind(restaurant_id);
        qb.push(" AND booking_date = ").push_bind(date);
        if let Some(ids) = table_ids {
            qb.push(" AND table_id = ANY(").push_bind(ids.to_vec()).push(")");
        }
        qb.push(" ORDER BY table_id, start_time");

        qb.build_query_as::<Booking>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load occupying bookings", e)
            })
    }

    async fn insert_if_available(&self, booking: &Booking) -> AppResult<Booking> {
        let result = sqlx::query_as::<_, Booking>(INSERT_IF_FREE)
            .bind(booking.id)
            .bind(&booking.reference)
            .bind(booking.restaurant_id)
            .bind(booking.customer_id)
            .bind(booking.table_id)
            .bind(booking.booking_date)
            .bind(booking.start_time)
            .bind(booking.end_time)
            .bind(booking.guest_count)
            .bind(&booking.customer.customer_name)
            .bind(&booking.customer.customer_email)
            .bind(&booking.customer.customer_phone)
            .bind(booking.pricing.fee)
            .bind(booking.pricing.base_fee)
            .bind(booking.pricing.markup_applied)
            .bind(booking.pricing.pricing_degraded)
            .bind(booking.payment_status)
            .bind(&booking.payment_reference)
            .bind(booking.status)
            .bind(sqlx::types::Json(&booking.history))
            .bind(&booking.special_requests)
            .bind(booking.version)
            .bind(booking.created_at)
            .bind(booking.updated_at)
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => {
                debug!(table_id = %booking.table_id, "Slot already occupied at insert");
                Err(self.conflict_for(booking).await)
            }
            Err(e) if is_exclusion_violation(&e) => {
                debug!(table_id = %booking.table_id, "Concurrent insert lost the slot");
                Err(self.conflict_for(booking).await)
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Database,
                "Failed to insert booking",
                e,
            )),
        }
    }

    async fn update_versioned(
        &self,
        booking: &Booking,
        expected_version: i64,
    ) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $3, payment_status = $4, payment_reference = $5, \
             history = $6, special_requests = $7, updated_at = $8, version = version + 1 \
             WHERE id = $1 AND version = $2 RETURNING *",
        )
        .bind(booking.id)
        .bind(expected_version)
        .bind(booking.status)
        .bind(booking.payment_status)
        .bind(&booking.payment_reference)
        .bind(sqlx::types::Json(&booking.history))
        .bind(&booking.special_requests)
        .bind(booking.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update booking", e))
    }

    async fn delete_terminal(&self, id: BookingId, expected_version: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM bookings WHERE id = $1 AND version = $2 \
             AND status IN ('cancelled', 'completed')",
        )
        .bind(id)
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete booking", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn query(&self, scope: BookingScope, filter: &BookingFilter) -> AppResult<Vec<Booking>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM bookings WHERE ");
        match scope {
            BookingScope::Restaurant(id) => {
                qb.push("restaurant_id = ").push_bind(id);
            }
            BookingScope::Customer(id) => {
                qb.push("customer_id = ").push_bind(id);
            }
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(from) = filter.date_from {
            qb.push(" AND booking_date >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            qb.push(" AND booking_date <= ").push_bind(to);
        }
        if let Some(search) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let pattern = format!("%{}%", escape_like(search));
            qb.push(" AND (customer_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR customer_email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR reference ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY booking_date, start_time, created_at");

        qb.build_query_as::<Booking>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list bookings", e))
    }

    async fn table_usage(
        &self,
        restaurant_id: RestaurantId,
        statuses: &[BookingStatus],
    ) -> AppResult<Vec<TableUsage>> {
        let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
        let rows = sqlx::query_as::<_, (TableId, i64)>(
            "SELECT table_id, COUNT(*) FROM bookings \
             WHERE restaurant_id = $1 AND status::text = ANY($2) \
             GROUP BY table_id",
        )
        .bind(restaurant_id)
        .bind(statuses)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate table usage", e)
        })?;

        Ok(rows
            .into_iter()
            .map(|(table_id, bookings)| TableUsage { table_id, bookings })
            .collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| {
                AppError::with_source(ErrorKind::ServiceUnavailable, "Health check failed", e)
            })
    }
}
