//! # tablebook-service
//!
//! Booking domain services for Tablebook:
//!
//! - [`AvailabilityChecker`] answers which tables are committed for a slot.
//! - [`FeeCalculator`] prices a table, with a popularity markup.
//! - [`BookingLifecycle`] owns creation, status transitions, history and
//!   deletion.
//! - [`NotificationDispatcher`] delivers status-change notices off the
//!   request path.
//!
//! Services follow constructor injection: store handles and collaborators
//! are provided at construction time via `Arc` references.

pub mod availability;
pub mod booking;
pub mod context;
pub mod notification;
pub mod pricing;

#[cfg(test)]
mod testing;

pub use availability::{AvailabilityChecker, AvailabilityQuery, AvailabilityReport};
pub use booking::{BookingLifecycle, BookingListing, BookingStats, CreateBookingParams};
pub use context::ActorContext;
pub use notification::{LogNotifier, NotificationDispatcher, StatusChangeNotice, StatusNotifier};
pub use pricing::{FeeCalculator, FeeQuote, PerGuestPricing, PricingPolicy};
