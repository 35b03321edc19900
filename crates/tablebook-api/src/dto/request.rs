//! Request DTOs with validation.
//!
//! Query parameters arrive as optional strings so that a missing or
//! malformed value becomes a field-level validation error rather than an
//! extractor rejection.

use serde::{Deserialize, Serialize};
use validator::Validate;

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_core::types::{RestaurantId, TableId, TimeWindow, parse_date};
use tablebook_database::store::BookingFilter;
use tablebook_entity::booking::{BookingStatus, PaymentStatus};
use tablebook_service::CreateBookingParams;

use crate::extractors::parse_id;

fn required(field: &str, value: Option<String>) -> AppResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::invalid_field(field, format!("{field} is required")))
}

/// Query for `GET /restaurants/{id}/availability`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityParams {
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    /// `HH:MM`.
    pub start: Option<String>,
    /// `HH:MM`.
    pub end: Option<String>,
    /// Comma-separated table ids; all tables when absent.
    pub tables: Option<String>,
}

impl AvailabilityParams {
    /// Required date, start and end.
    pub fn slot(&self) -> AppResult<(String, String, String)> {
        Ok((
            required("date", self.date.clone())?,
            required("start", self.start.clone())?,
            required("end", self.end.clone())?,
        ))
    }

    /// Parsed candidate tables.
    pub fn table_ids(&self) -> AppResult<Option<Vec<TableId>>> {
        let Some(raw) = self.tables.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };
        raw.split(',')
            .map(|id| parse_id::<TableId>("tables", id))
            .collect::<AppResult<Vec<_>>>()
            .map(Some)
    }
}

/// Query for `GET /restaurants/{id}/fee`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeeParams {
    /// Table id.
    pub table: Option<String>,
    /// Party size.
    pub guests: Option<String>,
}

impl FeeParams {
    /// Required table and party size.
    pub fn parse(&self) -> AppResult<(TableId, u32)> {
        let table = parse_id("table", &required("table", self.table.clone())?)?;
        let guests = required("guests", self.guests.clone())?
            .trim()
            .parse::<u32>()
            .map_err(|_| AppError::invalid_field("guests", "guests must be a positive integer"))?;
        Ok((table, guests))
    }
}

/// Query for booking listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingListParams {
    /// Only this status.
    pub status: Option<String>,
    /// Earliest date, inclusive.
    pub from: Option<String>,
    /// Latest date, inclusive.
    pub to: Option<String>,
    /// Search over customer name, email and reference.
    pub q: Option<String>,
}

impl BookingListParams {
    /// Convert into a store filter.
    pub fn into_filter(self) -> AppResult<BookingFilter> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Ok(BookingFilter {
            status: non_empty(self.status)
                .map(|s| s.parse::<BookingStatus>())
                .transpose()?,
            date_from: non_empty(self.from)
                .map(|d| parse_date("date_from", &d))
                .transpose()?,
            date_to: non_empty(self.to)
                .map(|d| parse_date("date_to", &d))
                .transpose()?,
            search: non_empty(self.q),
        })
    }
}

/// Body of `POST /restaurants/{id}/bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// Table to reserve.
    pub table_id: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
    /// Party size.
    pub guest_count: u32,
    /// Name the table is held under.
    pub customer_name: String,
    /// Contact email.
    pub customer_email: String,
    /// Optional phone number.
    #[serde(default)]
    pub customer_phone: Option<String>,
    /// Free-text requests.
    #[serde(default)]
    pub special_requests: Option<String>,
}

impl CreateBookingRequest {
    /// Parse the raw fields into lifecycle input.
    pub fn into_params(self, restaurant_id: RestaurantId) -> AppResult<CreateBookingParams> {
        Ok(CreateBookingParams {
            restaurant_id,
            table_id: parse_id("table_id", &self.table_id)?,
            date: parse_date("date", &self.date)?,
            window: TimeWindow::parse(&self.start_time, &self.end_time)?,
            guest_count: self.guest_count,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            special_requests: self.special_requests,
        })
    }
}

/// Body of `PATCH /bookings/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status.
    pub status: String,
}

impl UpdateStatusRequest {
    /// Parsed target status.
    pub fn status(&self) -> AppResult<BookingStatus> {
        self.status.parse()
    }
}

/// Body of `PUT /bookings/{id}/payment`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    /// `unpaid`, `paid` or `failed`.
    pub payment_status: String,
    /// Payment provider reference.
    #[validate(length(max = 200, message = "Provider reference is too long"))]
    #[serde(default)]
    pub provider_reference: Option<String>,
}

impl RecordPaymentRequest {
    /// Validated payment status and reference.
    pub fn parse(self) -> AppResult<(PaymentStatus, Option<String>)> {
        self.validate().map_err(|_| {
            AppError::invalid_field("provider_reference", "Provider reference is too long")
        })?;
        Ok((self.payment_status.parse()?, self.provider_reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablebook_core::error::ErrorKind;

    #[test]
    fn test_missing_slot_names_field() {
        let params = AvailabilityParams {
            date: Some("2026-10-19".into()),
            start: Some("18:00".into()),
            ..AvailabilityParams::default()
        };
        let err = params.slot().unwrap_err();
        assert_eq!(err.details.unwrap()["field"], "end");
    }

    #[test]
    fn test_table_list_parsing() {
        let a = TableId::new();
        let b = TableId::new();
        let params = AvailabilityParams {
            tables: Some(format!("{a}, {b}")),
            ..AvailabilityParams::default()
        };
        assert_eq!(params.table_ids().unwrap(), Some(vec![a, b]));

        let params = AvailabilityParams {
            tables: Some("x".into()),
            ..AvailabilityParams::default()
        };
        assert_eq!(params.table_ids().unwrap_err().kind, ErrorKind::Validation);
    }

    #[test]
    fn test_list_params_into_filter() {
        let filter = BookingListParams {
            status: Some("Confirmed".into()),
            from: Some("2026-10-01".into()),
            to: None,
            q: Some("  ".into()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.status, Some(BookingStatus::Confirmed));
        assert!(filter.date_from.is_some());
        assert!(filter.search.is_none());

        let err = BookingListParams {
            status: Some("seated".into()),
            ..BookingListParams::default()
        }
        .into_filter()
        .unwrap_err();
        assert_eq!(err.details.unwrap()["field"], "status");
    }

    #[test]
    fn test_fee_params_reject_negative_guests() {
        let err = FeeParams {
            table: Some(TableId::new().to_string()),
            guests: Some("-2".into()),
        }
        .parse()
        .unwrap_err();
        assert_eq!(err.details.unwrap()["field"], "guests");
    }
}
