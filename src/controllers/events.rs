use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::event::EVENT_STATUS_PUBLISHED;
use crate::models::Event;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

/* ---------- listing ---------- */

#[derive(Debug, Deserialize)]
struct EventsQuery {
    query: Option<String>,
    category: Option<String>,
}

// GET /api/events
//
// Serves from the cached catalog; only Published events are listed.
async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventsQuery>,
) -> impl IntoResponse {
    let needle = params.query.as_deref().map(str::to_lowercase);
    let events: Vec<Event> = state
        .cache
        .get_events()
        .await
        .into_iter()
        .filter(|e| e.is_published())
        .filter(|e| match &needle {
            Some(q) => {
                e.title.to_lowercase().contains(q)
                    || e.description
                        .as_deref()
                        .map(|d| d.to_lowercase().contains(q))
                        .unwrap_or(false)
            }
            None => true,
        })
        .filter(|e| match &params.category {
            Some(c) => e.category.as_deref() == Some(c.as_str()),
            None => true,
        })
        .collect();

    Json(json!({
        "success": true,
        "count": events.len(),
        "events": events,
    }))
}

// GET /api/events/{id}
async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .events
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("event"))?;
    Ok(Json(json!({ "success": true, "event": event })))
}

/* ---------- CRUD ---------- */

#[derive(Debug, Deserialize, Validate)]
struct CreateEventRequest {
    #[validate(length(min = 1))]
    title: String,
    description: Option<String>,
    category: Option<String>,
    #[validate(length(min = 1))]
    date: String,
    #[validate(length(min = 1))]
    time: String,
    #[validate(length(min = 1))]
    location: String,
    #[validate(range(min = 0.0))]
    price: f64,
    capacity: Option<i32>,
    image_url: Option<String>,
    status: Option<String>,
}

// POST /api/events
async fn create_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let now = Utc::now().naive_utc();
    let event = Event {
        id: Uuid::new_v4(),
        title: req.title,
        description: req.description,
        category: req.category,
        date: req.date,
        time: req.time,
        location: req.location,
        price: req.price,
        capacity: req.capacity,
        image_url: req.image_url,
        status: req.status.unwrap_or_else(|| EVENT_STATUS_PUBLISHED.to_string()),
        created_by: auth.email,
        attendees_count: 0,
        created_at: now,
        updated_at: now,
    };

    state.events.insert(event.clone()).await?;
    state.cache.invalidate_events().await;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "event": event })),
    ))
}

#[derive(Debug, Deserialize)]
struct UpdateEventRequest {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    date: Option<String>,
    time: Option<String>,
    location: Option<String>,
    price: Option<f64>,
    capacity: Option<i32>,
    image_url: Option<String>,
    status: Option<String>,
}

// PUT /api/events/{id}
//
// Only the creator or an admin may edit. `attendees_count` is owned by
// the booking service and cannot be patched here.
async fn update_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut event = state
        .events
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("event"))?;

    if event.created_by != auth.email && !auth.is_admin() {
        return Err(ApiError::Forbidden);
    }

    if let Some(title) = req.title {
        if title.is_empty() {
            return Err(ApiError::Validation("title must not be empty".to_string()));
        }
        event.title = title;
    }
    if let Some(description) = req.description {
        event.description = Some(description);
    }
    if let Some(category) = req.category {
        event.category = Some(category);
    }
    if let Some(date) = req.date {
        event.date = date;
    }
    if let Some(time) = req.time {
        event.time = time;
    }
    if let Some(location) = req.location {
        event.location = location;
    }
    if let Some(price) = req.price {
        if !price.is_finite() || price < 0.0 {
            return Err(ApiError::Validation("price must be non-negative".to_string()));
        }
        event.price = price;
    }
    if let Some(capacity) = req.capacity {
        event.capacity = Some(capacity);
    }
    if let Some(image_url) = req.image_url {
        event.image_url = Some(image_url);
    }
    if let Some(status) = req.status {
        event.status = status;
    }
    event.updated_at = Utc::now().naive_utc();

    if !state.events.update(&event).await? {
        return Err(ApiError::NotFound("event"));
    }
    state.cache.invalidate_events().await;

    Ok(Json(json!({ "success": true, "event": event })))
}

// DELETE /api/events/{id}
async fn delete_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .events
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("event"))?;

    if event.created_by != auth.email && !auth.is_admin() {
        return Err(ApiError::Forbidden);
    }

    if !state.events.delete(id).await? {
        return Err(ApiError::NotFound("event"));
    }
    state.cache.invalidate_events().await;

    Ok(Json(json!({ "success": true, "message": "Event deleted" })))
}
