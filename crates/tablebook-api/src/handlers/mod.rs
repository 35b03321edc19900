//! HTTP request handlers.

pub mod availability;
pub mod bookings;
pub mod fee;
pub mod health;
