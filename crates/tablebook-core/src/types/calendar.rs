//! Calendar day and wall-clock time-window types.
//!
//! Booking windows are restaurant-local wall-clock times on a single
//! calendar day. Windows are half-open: `[start, end)`.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Parse a calendar day in `YYYY-MM-DD` form.
pub fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::invalid_field(
            field,
            format!("Invalid date '{value}': expected YYYY-MM-DD"),
        )
    })
}

/// Parse a wall-clock time in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time(field: &str, value: &str) -> AppResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| {
            AppError::invalid_field(field, format!("Invalid time '{value}': expected HH:MM"))
        })
}

/// A half-open `[start, end)` wall-clock window within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive start.
    pub start: NaiveTime,
    /// Exclusive end.
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Build a window, rejecting empty, inverted, and midnight-crossing windows.
    pub fn new(start: NaiveTime, end: NaiveTime) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::invalid_field(
                "end_time",
                format!("End time {end} must be after start time {start}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// Parse and validate a window from `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> AppResult<Self> {
        let start = parse_time("start_time", start)?;
        let end = parse_time("end_time", end)?;
        Self::new(start, end)
    }

    /// Half-open overlap test: `[s1, e1)` and `[s2, e2)` conflict iff
    /// `s1 < e2 && s2 < e1`. Windows that only touch do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether this window lies entirely inside `outer`.
    pub fn within(&self, outer: &TimeWindow) -> bool {
        outer.start <= self.start && self.end <= outer.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}
