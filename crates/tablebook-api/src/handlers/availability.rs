//! Slot availability handler.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};

use tablebook_core::types::RestaurantId;
use tablebook_service::AvailabilityQuery;

use crate::dto::request::AvailabilityParams;
use crate::dto::response::{ApiResponse, AvailabilityResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// GET /api/restaurants/{id}/availability?date&start&end&tables
pub async fn check_availability(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    params: Result<Query<AvailabilityParams>, QueryRejection>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, ApiError> {
    let Query(params) = params?;
    let restaurant_id: RestaurantId = parse_id("restaurant_id", &id)?;
    let (date, start, end) = params.slot()?;

    let query = AvailabilityQuery::parse(restaurant_id, &date, &start, &end, params.table_ids()?)?;
    let report = state.availability.check(&query).await?;

    Ok(Json(ApiResponse::ok(report.into())))
}
