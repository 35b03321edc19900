//! Response DTOs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tablebook_core::types::{RestaurantId, TableId, TimeWindow};
use tablebook_service::{AvailabilityReport, FeeQuote};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// `connected` or `unavailable`.
    pub database: String,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// A `[start, end)` window as `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowResponse {
    pub start_time: String,
    pub end_time: String,
}

impl From<&TimeWindow> for WindowResponse {
    fn from(w: &TimeWindow) -> Self {
        Self {
            start_time: w.start.format("%H:%M").to_string(),
            end_time: w.end.format("%H:%M").to_string(),
        }
    }
}

/// Availability of one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSlotResponse {
    pub table_id: TableId,
    pub available: bool,
    /// Committed windows overlapping the request.
    pub conflicts: Vec<WindowResponse>,
}

/// Availability of a restaurant's tables for one slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub restaurant_id: RestaurantId,
    pub date: NaiveDate,
    pub window: WindowResponse,
    /// Tables committed for the slot.
    pub occupied_tables: Vec<TableId>,
    /// Every checked table.
    pub tables: Vec<TableSlotResponse>,
}

impl From<AvailabilityReport> for AvailabilityResponse {
    fn from(report: AvailabilityReport) -> Self {
        let occupied_tables = report.occupied_tables();
        let tables = report
            .tables
            .iter()
            .map(|(id, a)| TableSlotResponse {
                table_id: *id,
                available: !a.occupied,
                conflicts: a.conflicts.iter().map(WindowResponse::from).collect(),
            })
            .collect();
        Self {
            restaurant_id: report.restaurant_id,
            date: report.date,
            window: WindowResponse::from(&report.window),
            occupied_tables,
            tables,
        }
    }
}

/// Fee quote for a table and party size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeResponse {
    pub table_id: TableId,
    pub guest_count: u32,
    pub fee: Decimal,
    pub base_fee: Decimal,
    pub markup_applied: bool,
    /// Popularity data was unavailable and the base fee was charged.
    pub degraded: bool,
}

impl FeeResponse {
    /// Wrap a quote.
    pub fn new(table_id: TableId, guest_count: u32, quote: FeeQuote) -> Self {
        Self {
            table_id,
            guest_count,
            fee: quote.fee,
            base_fee: quote.base_fee,
            markup_applied: quote.markup_applied,
            degraded: quote.degraded,
        }
    }
}
