//! # tablebook-core
//!
//! Core crate for Tablebook. Contains configuration schemas, typed
//! identifiers, calendar/time-window value types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Tablebook crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
