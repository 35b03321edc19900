//! Service-hours validation for requested windows.

use chrono::NaiveDate;
use serde_json::json;

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_core::types::{RestaurantId, TimeWindow};
use tablebook_database::store::RestaurantDirectory;

/// Fail with a validation error unless `window` on `date` falls inside one
/// of the restaurant's service periods. An empty schedule imposes no
/// restriction.
pub async fn ensure_within_service_hours(
    directory: &dyn RestaurantDirectory,
    restaurant_id: RestaurantId,
    date: NaiveDate,
    window: &TimeWindow,
) -> AppResult<()> {
    let hours = directory.get_operating_hours(restaurant_id).await?;
    if hours.contains(date, window) {
        return Ok(());
    }

    let periods: Vec<_> = hours
        .periods_on(date)
        .map(|p| {
            json!({
                "open": p.open.format("%H:%M").to_string(),
                "close": p.close.format("%H:%M").to_string(),
            })
        })
        .collect();

    Err(AppError::validation(format!(
        "Requested window {window} on {date} is outside service hours"
    ))
    .with_details(json!({
        "field": "start_time",
        "service_periods": periods,
    })))
}
