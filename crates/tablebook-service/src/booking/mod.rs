//! Booking lifecycle: creation, status transitions, history, deletion.

pub mod access;
pub mod params;
pub mod reference;
pub mod service;
pub mod stats;

pub use params::CreateBookingParams;
pub use reference::generate_reference;
pub use service::BookingLifecycle;
pub use stats::{BookingListing, BookingStats};
