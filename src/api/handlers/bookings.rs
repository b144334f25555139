//! Availability and booking endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::AppState;
use crate::api::dto::{
    domain_error, ApiError, ApiResponse, ApiResult, AvailabilityQuery, CreateBookingRequest,
};
use crate::api::validated_json::ValidatedJson;
use crate::domain::{AvailabilityPayload, Booking};

/// `GET /api/bookings/availability/{courtId}?date=YYYY-MM-DD`
pub async fn get_availability(
    State(state): State<AppState>,
    Path(court_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<AvailabilityPayload> {
    let payload = state
        .service
        .availability(&court_id, query.date)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(payload)))
}

pub async fn create_booking(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Booking>>), ApiError> {
    let booking = state
        .service
        .create_booking(request.into())
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(booking))))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> ApiResult<Booking> {
    let booking = state.service.get_booking(booking_id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking)))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> ApiResult<Booking> {
    let booking = state
        .service
        .cancel_booking(booking_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking)))
}
