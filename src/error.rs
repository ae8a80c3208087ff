//! Boundary error taxonomy.
//!
//! Validation and seat-conflict rejections are detected before any write
//! and map to 4xx; unexpected persistence failures map to a generic 500
//! without partial-state detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::Seat;
use crate::services::bookings::BookingError;
use crate::services::validator::BookingRejection;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("seat {0} is already taken")]
    SeatConflict(Seat),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("email already registered")]
    EmailTaken,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::SeatConflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::EmailTaken => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            // The conflicting seat travels with the rejection so clients
            // can highlight it.
            ApiError::SeatConflict(seat) => json!({
                "success": false,
                "error": self.to_string(),
                "seat": seat,
            }),
            ApiError::Internal(e) => {
                tracing::error!("internal error: {e:?}");
                json!({
                    "success": false,
                    "error": "internal server error",
                })
            }
            _ => json!({
                "success": false,
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => ApiError::EmailTaken,
            StoreError::Database(e) => ApiError::Internal(e.into()),
        }
    }
}

impl From<BookingRejection> for ApiError {
    fn from(r: BookingRejection) -> Self {
        match r {
            BookingRejection::SeatTaken(seat) => ApiError::SeatConflict(seat),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::Rejected(r) => r.into(),
            BookingError::NotFound => ApiError::NotFound("booking"),
            BookingError::Store(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        ApiError::Validation(e.to_string())
    }
}
