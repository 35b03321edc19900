//! Typed path parameter helpers.

use std::str::FromStr;

use tablebook_core::error::AppError;

/// Parses an identifier from a path or query segment, naming `field` in the
/// validation error.
pub fn parse_id<T: FromStr>(field: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::invalid_field(field, format!("Invalid {field}: '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablebook_core::types::BookingId;

    #[test]
    fn test_parse_id() {
        let id = BookingId::new();
        assert_eq!(parse_id::<BookingId>("booking_id", &id.to_string()).unwrap(), id);

        let err = parse_id::<BookingId>("booking_id", "nope").unwrap_err();
        assert_eq!(err.details.unwrap()["field"], "booking_id");
    }
}
