//! Core type definitions used across the Tablebook workspace.

pub mod calendar;
pub mod id;

pub use calendar::{TimeWindow, parse_date, parse_time};
pub use id::*;
