use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const EVENT_STATUS_PUBLISHED: &str = "Published";

/// Catalog record for a bookable event.
///
/// `attendees_count` is a denormalized counter owned by the booking
/// service; it is adjusted when bookings are confirmed or cancelled and
/// never recomputed from bookings on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: String,
    pub time: String,
    pub location: String,
    pub price: f64,
    pub capacity: Option<i32>,
    pub image_url: Option<String>,
    pub status: String,
    pub created_by: String,
    pub attendees_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Event {
    pub fn is_published(&self) -> bool {
        self.status == EVENT_STATUS_PUBLISHED
    }
}
