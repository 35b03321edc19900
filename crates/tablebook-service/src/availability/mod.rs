//! Slot availability for restaurant tables.

pub mod checker;
pub mod hours;

pub use checker::{AvailabilityChecker, AvailabilityQuery, AvailabilityReport, TableAvailability};
pub use hours::ensure_within_service_hours;
