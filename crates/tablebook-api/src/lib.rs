//! # tablebook-api
//!
//! HTTP API layer for Tablebook built on Axum.
//!
//! Exposes availability, fee quotes and the booking lifecycle as REST
//! endpoints, with bearer-token authentication, request logging, CORS and
//! error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
