//! In-memory store implementations for single-node deployments and tests.

pub mod booking;
pub mod restaurant;

pub use booking::MemoryBookingStore;
pub use restaurant::MemoryRestaurantDirectory;
