//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use tablebook_auth::JwtDecoder;
use tablebook_core::config::AppConfig;
use tablebook_core::result::AppResult;
use tablebook_database::store::{BookingStore, RestaurantDirectory};
use tablebook_service::{
    AvailabilityChecker, BookingLifecycle, FeeCalculator, NotificationDispatcher,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Stores ───────────────────────────────────────────────
    /// Booking store (PostgreSQL or in-memory)
    pub bookings: Arc<dyn BookingStore>,
    /// Restaurant directory (PostgreSQL or in-memory)
    pub directory: Arc<dyn RestaurantDirectory>,

    // ── Services ─────────────────────────────────────────────
    /// Availability checker
    pub availability: Arc<AvailabilityChecker>,
    /// Fee calculator
    pub pricing: Arc<FeeCalculator>,
    /// Booking lifecycle manager
    pub lifecycle: Arc<BookingLifecycle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire the booking services over the given stores.
    ///
    /// Fails if the pricing configuration names an unknown booking status.
    pub fn new(
        config: AppConfig,
        bookings: Arc<dyn BookingStore>,
        directory: Arc<dyn RestaurantDirectory>,
        notifications: NotificationDispatcher,
    ) -> AppResult<Self> {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let availability = Arc::new(AvailabilityChecker::new(
            Arc::clone(&bookings),
            Arc::clone(&directory),
        ));
        let pricing = Arc::new(FeeCalculator::new(
            Arc::clone(&bookings),
            Arc::clone(&directory),
            config.pricing.clone(),
        )?);
        let lifecycle = Arc::new(BookingLifecycle::new(
            Arc::clone(&bookings),
            Arc::clone(&directory),
            Arc::clone(&availability),
            Arc::clone(&pricing),
            notifications,
            config.booking.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            jwt_decoder,
            bookings,
            directory,
            availability,
            pricing,
            lifecycle,
        })
    }
}
