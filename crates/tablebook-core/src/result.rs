//! Convenience result type alias for Tablebook.

use crate::error::AppError;

/// A specialized `Result` type for Tablebook operations.
pub type AppResult<T> = Result<T, AppError>;
