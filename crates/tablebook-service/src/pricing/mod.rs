//! Booking fee computation with popularity markup.

pub mod calculator;
pub mod policy;

pub use calculator::{FeeCalculator, FeeQuote, rank_popular_tables};
pub use policy::{PerGuestPricing, PricingPolicy};
