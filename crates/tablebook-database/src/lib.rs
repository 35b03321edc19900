//! # tablebook-database
//!
//! Persistence for Tablebook: the [`BookingStore`] and
//! [`RestaurantDirectory`] ports, their PostgreSQL implementations, and
//! in-memory implementations for single-node use and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::{MemoryBookingStore, MemoryRestaurantDirectory};
pub use repositories::{BookingRepository, RestaurantRepository};
pub use store::{BookingFilter, BookingScope, BookingStore, RestaurantDirectory, TableUsage};
