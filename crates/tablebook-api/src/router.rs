//! Route definitions for the Tablebook HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(restaurant_routes())
        .merge(booking_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .nest("/api", api_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Availability, fee quotes and restaurant-scoped bookings
fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/restaurants/{id}/availability",
            get(handlers::availability::check_availability),
        )
        .route("/restaurants/{id}/fee", get(handlers::fee::quote_fee))
        .route(
            "/restaurants/{id}/bookings",
            get(handlers::bookings::list_restaurant_bookings)
                .post(handlers::bookings::create_booking),
        )
}

/// Booking lifecycle
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(handlers::bookings::list_my_bookings))
        .route(
            "/bookings/{id}",
            get(handlers::bookings::get_booking).delete(handlers::bookings::delete_booking),
        )
        .route(
            "/bookings/{id}/status",
            patch(handlers::bookings::update_status),
        )
        .route(
            "/bookings/{id}/payment",
            put(handlers::bookings::record_payment),
        )
}
