//! Input for booking creation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use tablebook_core::error::AppError;
use tablebook_core::types::{RestaurantId, TableId, TimeWindow};
use tablebook_entity::booking::CustomerInfo;

/// A candidate reservation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingParams {
    /// Restaurant to book at.
    pub restaurant_id: RestaurantId,
    /// Table to reserve.
    pub table_id: TableId,
    /// Calendar day.
    pub date: NaiveDate,
    /// `[start, end)` window, already validated as non-empty.
    pub window: TimeWindow,
    /// Party size.
    #[validate(range(min = 1, message = "Guest count must be at least 1"))]
    pub guest_count: u32,
    /// Name the table is held under.
    #[validate(length(min = 1, max = 200, message = "Customer name is required"))]
    pub customer_name: String,
    /// Contact email.
    #[validate(email(message = "Customer email is not a valid address"))]
    pub customer_email: String,
    /// Optional phone number.
    #[validate(length(max = 40, message = "Phone number is too long"))]
    pub customer_phone: Option<String>,
    /// Free-text requests.
    #[validate(length(max = 1000, message = "Special requests are too long"))]
    pub special_requests: Option<String>,
}

impl CreateBookingParams {
    /// Run field validation and the party-size ceiling.
    pub fn check(&self, max_guest_count: u32) -> Result<(), AppError> {
        self.validate().map_err(first_field_error)?;

        if self.customer_name.trim().is_empty() {
            return Err(AppError::invalid_field(
                "customer_name",
                "Customer name is required",
            ));
        }
        if self.guest_count > max_guest_count {
            return Err(AppError::invalid_field(
                "guest_count",
                format!("Guest count must not exceed {max_guest_count}"),
            ));
        }
        Ok(())
    }

    /// Contact details with surrounding whitespace removed.
    pub fn customer_info(&self) -> CustomerInfo {
        CustomerInfo {
            customer_name: self.customer_name.trim().to_string(),
            customer_email: self.customer_email.trim().to_string(),
            customer_phone: self
                .customer_phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        }
    }
}

/// Map `validator` output to a validation error naming one offending field.
fn first_field_error(errors: ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().collect();
    fields.sort();

    match fields.first() {
        Some(field) => {
            let message = field_errors[*field]
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for {field}"));
            AppError::invalid_field(field, message)
        }
        None => AppError::validation(format!("Invalid booking request: {errors}")),
    }
}
