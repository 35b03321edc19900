//! PostgreSQL implementations of the store ports.

pub mod booking;
pub mod restaurant;

pub use booking::BookingRepository;
pub use restaurant::RestaurantRepository;
