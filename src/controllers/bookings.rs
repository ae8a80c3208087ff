use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{Booking, BookingStatus, Seat};
use crate::services::bookings::{BookingPatch, NewBooking};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seats", get(get_reserved_seats))
        .route("/bookings", get(get_user_bookings).post(create_booking))
        .route("/bookings/cancel", patch(cancel_booking))
        .route("/bookings/{id}", get(get_booking).patch(update_booking))
}

/* ---------- helpers ---------- */

/// Bookings are private to their owner; admins see everything.
fn assert_owner(booking: &Booking, auth: &AuthUser) -> Result<(), ApiError> {
    if booking.user_email != auth.email && !auth.is_admin() {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

/* ---------- BOOKINGS ---------- */

#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    event_id: Uuid,
    seats: Vec<Seat>,
    total_price: f64,
    // Event snapshot captured at booking time. Intentionally not re-read
    // from the catalog: the source of these fields is the page the user
    // booked from, and a later event edit must not rewrite history.
    #[serde(default)]
    event_title: String,
    #[serde(default)]
    event_date: String,
    #[serde(default)]
    event_time: String,
    #[serde(default)]
    event_location: String,
}

// POST /api/bookings
async fn create_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .bookings
        .create_booking(NewBooking {
            event_id: req.event_id,
            event_title: req.event_title,
            event_date: req.event_date,
            event_time: req.event_time,
            event_location: req.event_location,
            user_email: auth.email,
            user_name: auth.full_name,
            seats: req.seats,
            total_price: req.total_price,
        })
        .await?;

    // Seat map and attendee counts changed
    state.cache.invalidate_seats(booking.event_id).await;
    state.cache.invalidate_events().await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "booking_id": booking.id,
            "booking": booking,
        })),
    ))
}

// GET /api/bookings
async fn get_user_bookings(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = state.bookings.list_bookings(Some(&auth.email)).await?;
    Ok(Json(json!({
        "success": true,
        "count": bookings.len(),
        "bookings": bookings,
    })))
}

// GET /api/bookings/{id}
async fn get_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state.bookings.get_booking(id).await?;
    assert_owner(&booking, &auth)?;
    Ok(Json(json!({ "success": true, "booking": booking })))
}

#[derive(Debug, Deserialize)]
struct UpdateBookingRequest {
    booking_status: Option<BookingStatus>,
    num_tickets: Option<i32>,
    user_name: Option<String>,
}

// PATCH /api/bookings/{id}
async fn update_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let existing = state.bookings.get_booking(id).await?;
    assert_owner(&existing, &auth)?;

    let booking = state
        .bookings
        .update_booking(
            id,
            BookingPatch {
                booking_status: req.booking_status,
                num_tickets: req.num_tickets,
                user_name: req.user_name,
            },
        )
        .await?;

    state.cache.invalidate_seats(booking.event_id).await;
    state.cache.invalidate_events().await;

    Ok(Json(json!({ "success": true, "booking": booking })))
}

#[derive(Debug, Deserialize)]
struct CancelBookingRequest {
    booking_id: Uuid,
}

// PATCH /api/bookings/cancel
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let existing = state.bookings.get_booking(req.booking_id).await?;
    assert_owner(&existing, &auth)?;

    let booking = state.bookings.cancel_booking(req.booking_id).await?;

    state.cache.invalidate_seats(booking.event_id).await;
    state.cache.invalidate_events().await;

    Ok(Json(json!({
        "success": true,
        "message": "Booking cancelled",
        "booking": booking,
    })))
}

/* ---------- SEATS ---------- */

#[derive(Debug, Deserialize)]
struct SeatsQuery {
    event_id: Uuid,
}

// GET /api/seats?event_id=...
//
// Public endpoint backing the hall matrix; cached per event with a short
// TTL and invalidated on every booking mutation.
async fn get_reserved_seats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeatsQuery>,
) -> Result<Response, ApiError> {
    if let Ok(Some(cached_json)) = state.cache.get_cached_seats(params.event_id).await {
        return Response::builder()
            .header("Content-Type", "application/json")
            .header("X-Cache", "HIT")
            .body(Body::from(cached_json))
            .map_err(|e| ApiError::Internal(e.into()));
    }

    let seats = state.bookings.get_reserved_seats(params.event_id).await?;
    let payload = json!({
        "success": true,
        "event_id": params.event_id,
        "seats": seats,
    })
    .to_string();

    if let Err(e) = state.cache.cache_seats(params.event_id, &payload).await {
        tracing::warn!("failed to cache seats for event {}: {:?}", params.event_id, e);
    }

    Response::builder()
        .header("Content-Type", "application/json")
        .header("X-Cache", "MISS")
        .body(Body::from(payload))
        .map_err(|e| ApiError::Internal(e.into()))
}
