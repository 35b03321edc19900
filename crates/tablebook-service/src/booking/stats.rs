//! Aggregate statistics over a booking listing.

use serde::Serialize;

use tablebook_entity::booking::{Booking, BookingStatus};

/// Counts per status and total party size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BookingStats {
    /// Number of bookings.
    pub total: u64,
    /// Pending bookings.
    pub pending: u64,
    /// Confirmed bookings.
    pub confirmed: u64,
    /// Cancelled bookings.
    pub cancelled: u64,
    /// Completed bookings.
    pub completed: u64,
    /// Sum of guest counts.
    pub total_guests: u64,
}

impl BookingStats {
    /// Compute statistics over `bookings`.
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        bookings.iter().fold(Self::default(), |mut stats, b| {
            stats.total += 1;
            stats.total_guests += u64::try_from(b.guest_count).unwrap_or(0);
            match b.status {
                BookingStatus::Pending => stats.pending += 1,
                BookingStatus::Confirmed => stats.confirmed += 1,
                BookingStatus::Cancelled => stats.cancelled += 1,
                BookingStatus::Completed => stats.completed += 1,
            }
            stats
        })
    }
}

/// Bookings matching a filter, with statistics over the same set.
#[derive(Debug, Clone, Serialize)]
pub struct BookingListing {
    /// Matching bookings, by date then start time.
    pub bookings: Vec<Booking>,
    /// Statistics over `bookings`.
    pub stats: BookingStats,
}

impl BookingListing {
    /// Wrap a listing and compute its statistics.
    pub fn new(bookings: Vec<Booking>) -> Self {
        let stats = BookingStats::from_bookings(&bookings);
        Self { bookings, stats }
    }
}
