//! Fee quote handler.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};

use tablebook_core::types::RestaurantId;

use crate::dto::request::FeeParams;
use crate::dto::response::{ApiResponse, FeeResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// GET /api/restaurants/{id}/fee?table&guests
pub async fn quote_fee(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    params: Result<Query<FeeParams>, QueryRejection>,
) -> Result<Json<ApiResponse<FeeResponse>>, ApiError> {
    let Query(params) = params?;
    let restaurant_id: RestaurantId = parse_id("restaurant_id", &id)?;
    let (table_id, guests) = params.parse()?;

    let quote = state
        .pricing
        .compute_fee(restaurant_id, table_id, guests)
        .await?;

    Ok(Json(ApiResponse::ok(FeeResponse::new(table_id, guests, quote))))
}
