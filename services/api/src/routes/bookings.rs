//! Bookings

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::models::{Booking, BookingFilter, NewBooking, StatusUpdate, UpdateBooking};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    validation::{ApiQuery, ValidatedJson},
};

pub async fn list_bookings(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<BookingFilter>,
) -> ApiResult<Json<Vec<Booking>>> {
    Ok(Json(state.storage.list_bookings(&filter).await?))
}

/// Create a booking; a missing duration or total price comes from the service
pub async fn create_booking(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewBooking>,
) -> ApiResult<impl IntoResponse> {
    let payload = if payload.needs_pricing() {
        let service = state
            .storage
            .get_service(&payload.service_id)
            .await?
            .ok_or_else(|| ApiError::invalid_field("serviceId", "Unknown service"))?;
        payload.priced_from(&service)
    } else {
        payload
    };

    let booking = state.storage.create_booking(payload).await?;
    info!(
        "Created booking {} for client {} with provider {}",
        booking.id, booking.client_id, booking.hairstylist_id
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Booking>> {
    state
        .storage
        .get_booking(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Booking"))
}

pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateBooking>,
) -> ApiResult<Json<Booking>> {
    state
        .storage
        .update_booking(&id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Booking"))
}

/// Change only the status of a booking
pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<StatusUpdate>,
) -> ApiResult<Json<Booking>> {
    let booking = state
        .storage
        .update_booking_status(&id, &payload.status)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking"))?;
    info!("Booking {} is now {}", booking.id, booking.status);
    Ok(Json(booking))
}

pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.storage.delete_booking(&id).await? {
        return Err(ApiError::not_found("Booking"));
    }
    info!("Deleted booking {}", id);
    Ok(StatusCode::NO_CONTENT)
}
