#![allow(dead_code)]

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use event_booking::models::{Event, Seat};
use event_booking::services::bookings::{BookingService, NewBooking};
use event_booking::store::{BookingStore, EventStore, MemoryStore};

pub struct TestApp {
    pub service: BookingService,
    pub events: Arc<dyn EventStore>,
    pub bookings: Arc<dyn BookingStore>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let events: Arc<dyn EventStore> = store.clone();
    let bookings: Arc<dyn BookingStore> = store.clone();
    TestApp {
        service: BookingService::new(bookings.clone(), events.clone()),
        events,
        bookings,
    }
}

pub async fn seed_event(app: &TestApp, title: &str) -> Event {
    let now = Utc::now().naive_utc();
    let event = Event {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        category: Some("music".to_string()),
        date: "2025-09-12".to_string(),
        time: "19:30".to_string(),
        location: "Main Hall".to_string(),
        price: 20.0,
        capacity: Some(200),
        image_url: None,
        status: "Published".to_string(),
        created_by: "organizer@example.com".to_string(),
        attendees_count: 0,
        created_at: now,
        updated_at: now,
    };
    app.events.insert(event.clone()).await.unwrap();
    event
}

pub fn booking_request(event: &Event, email: &str, seats: Vec<Seat>, price: f64) -> NewBooking {
    request_for_event_id(event.id, event, email, seats, price)
}

pub fn request_for_event_id(
    event_id: Uuid,
    event: &Event,
    email: &str,
    seats: Vec<Seat>,
    price: f64,
) -> NewBooking {
    NewBooking {
        event_id,
        event_title: event.title.clone(),
        event_date: event.date.clone(),
        event_time: event.time.clone(),
        event_location: event.location.clone(),
        user_email: email.to_string(),
        user_name: "Test User".to_string(),
        seats,
        total_price: price,
    }
}

pub fn seat(row: i32, column: i32) -> Seat {
    Seat::new(row, column)
}
