//! Restaurant directory entities.

pub mod hours;
pub mod model;
pub mod table;

pub use hours::{DayHours, OperatingHours};
pub use model::Restaurant;
pub use table::DiningTable;
