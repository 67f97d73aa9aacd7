//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Booking, BookingRequest, BookingStatus, DeleteResult, SlotAvailability};

use crate::auth::AuthContext;
use crate::core::ServerState;
use crate::reservations::Admission;
use crate::utils::time::{parse_date, today};
use crate::utils::{AppError, AppResult, ErrorCode};

/// `?date=YYYY-MM-DD&guests=N`
#[derive(Debug, Deserialize)]
pub struct BookingOptionsQuery {
    date: Option<String>,
    guests: Option<String>,
}

/// GET /booking-options - 剩余座位
pub async fn booking_options(
    State(state): State<ServerState>,
    Query(query): Query<BookingOptionsQuery>,
) -> AppResult<Json<Vec<SlotAvailability>>> {
    let date = query
        .date
        .as_deref()
        .ok_or_else(|| AppError::with_message(ErrorCode::RequiredField, "date is required"))
        .and_then(parse_date)?;
    let guests: u32 = query
        .guests
        .as_deref()
        .ok_or_else(|| AppError::with_message(ErrorCode::RequiredField, "guests is required"))?
        .trim()
        .parse()
        .map_err(|_| AppError::with_message(ErrorCode::InvalidFormat, "guests must be a number"))?;

    let slots = state.availability.get_availability(guests, date).await?;
    Ok(Json(slots))
}

/// GET /bookings - 全部预订 (管理员)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.stores.bookings.find_all().await?;
    Ok(Json(bookings))
}

/// GET /bookings/{email} - 本人的预订
pub async fn list_by_email(
    State(state): State<ServerState>,
    auth: AuthContext,
    Path(email): Path<String>,
) -> AppResult<Json<Vec<Booking>>> {
    auth.require_self(&email)?;
    let bookings = state.stores.bookings.find_by_email(&email).await?;
    Ok(Json(bookings))
}

/// POST /bookings - 提交预订
///
/// Admission rejections come back as `200` with `{rejected, overBooking, reason}`.
pub async fn create(
    State(state): State<ServerState>,
    auth: AuthContext,
    Json(request): Json<BookingRequest>,
) -> AppResult<Json<Admission>> {
    let admission = state
        .admission
        .submit_booking(&auth.email, request, today(state.tz))
        .await?;
    Ok(Json(admission))
}

async fn load(state: &ServerState, id: &str) -> AppResult<Booking> {
    state
        .stores
        .bookings
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound).with_detail("id", id))
}

async fn transition(state: &ServerState, id: &str, status: BookingStatus) -> AppResult<Booking> {
    state
        .stores
        .bookings
        .set_status(id, status)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound).with_detail("id", id))
}

/// PATCH /bookings/{id} - 确认预订 (管理员)
pub async fn confirm(
    State(state): State<ServerState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = load(&state, &id).await?;
    if booking.status != BookingStatus::Pending {
        return Err(AppError::new(ErrorCode::BookingInvalidState)
            .with_detail("status", booking.status.as_str()));
    }

    let booking = transition(&state, &id, BookingStatus::Confirmed).await?;
    tracing::info!(booking_id = %id, admin = %auth.email, "Booking confirmed");
    Ok(Json(booking))
}

/// PATCH /bookings/{id}/cancel - 取消预订
pub async fn cancel(
    State(state): State<ServerState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = load(&state, &id).await?;
    auth.require_owner_or_admin(&booking.user_email)?;
    if booking.status == BookingStatus::Cancelled {
        return Err(AppError::new(ErrorCode::BookingInvalidState)
            .with_detail("status", booking.status.as_str()));
    }

    let booking = transition(&state, &id, BookingStatus::Cancelled).await?;
    tracing::info!(booking_id = %id, by = %auth.email, "Booking cancelled");
    Ok(Json(booking))
}

/// DELETE /bookings/{id}
pub async fn delete(
    State(state): State<ServerState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResult>> {
    let booking = load(&state, &id).await?;
    auth.require_owner_or_admin(&booking.user_email)?;

    let deleted = state.stores.bookings.delete(&id).await?;
    tracing::info!(booking_id = %id, by = %auth.email, "Booking deleted");
    Ok(Json(DeleteResult::count(usize::from(deleted))))
}
