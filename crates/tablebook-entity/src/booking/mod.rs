//! Booking domain entities.

pub mod history;
pub mod model;
pub mod status;

pub use history::{BookingHistory, HistoryAction, HistoryEntry};
pub use model::{Booking, CustomerInfo, FeeSnapshot};
pub use status::{BookingStatus, PaymentStatus};
