//! Booking lifecycle handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use tablebook_core::types::{BookingId, RestaurantId};
use tablebook_entity::booking::Booking;
use tablebook_service::BookingListing;
use tablebook_service::availability::ensure_within_service_hours;

use crate::dto::request::{
    BookingListParams, CreateBookingRequest, RecordPaymentRequest, UpdateStatusRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// POST /api/restaurants/{id}/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Booking>>), ApiError> {
    let Json(req) = body?;
    let restaurant_id: RestaurantId = parse_id("restaurant_id", &id)?;
    let params = req.into_params(restaurant_id)?;

    ensure_within_service_hours(
        state.directory.as_ref(),
        restaurant_id,
        params.date,
        &params.window,
    )
    .await?;

    let booking = state.lifecycle.create(&auth, params).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(booking))))
}

/// GET /api/restaurants/{id}/bookings?status&from&to&q
pub async fn list_restaurant_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    params: Result<Query<BookingListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<BookingListing>>, ApiError> {
    let Query(params) = params?;
    let restaurant_id: RestaurantId = parse_id("restaurant_id", &id)?;

    let listing = state
        .lifecycle
        .list_for_restaurant(&auth, restaurant_id, params.into_filter()?)
        .await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// GET /api/bookings
pub async fn list_my_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    params: Result<Query<BookingListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<BookingListing>>, ApiError> {
    let Query(params) = params?;
    let listing = state
        .lifecycle
        .list_for_customer(&auth, params.into_filter()?)
        .await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let booking_id: BookingId = parse_id("booking_id", &id)?;
    let booking = state.lifecycle.get(&auth, booking_id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// PATCH /api/bookings/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let Json(req) = body?;
    let booking_id: BookingId = parse_id("booking_id", &id)?;

    let booking = state
        .lifecycle
        .transition(&auth, booking_id, req.status()?)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// PUT /api/bookings/{id}/payment
pub async fn record_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<RecordPaymentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let Json(req) = body?;
    let booking_id: BookingId = parse_id("booking_id", &id)?;
    let (payment_status, reference) = req.parse()?;

    let booking = state
        .lifecycle
        .record_payment(&auth, booking_id, payment_status, reference)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// DELETE /api/bookings/{id}
pub async fn delete_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let booking_id: BookingId = parse_id("booking_id", &id)?;
    state.lifecycle.delete(&auth, booking_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Booking deleted".to_string(),
    })))
}
