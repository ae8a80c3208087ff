//! Postgres-backed stores. Queries are written without the compile-time
//! checked macros so the crate builds without a live database.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, Event, Seat, User};

use super::{BookingStore, EventStore, StoreError, UserStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_err(e: sqlx::Error, key: &str) -> StoreError {
    if let sqlx::Error::Database(ref db) = e {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return StoreError::Duplicate(key.to_string());
        }
    }
    StoreError::Database(e)
}

/* ---------- users ---------- */

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    full_name: String,
    phone: Option<String>,
    city: Option<String>,
    avatar_url: Option<String>,
    role: String,
    favorite_categories: Json<Vec<String>>,
    favorite_events: Json<Vec<String>>,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
            full_name: r.full_name,
            phone: r.phone,
            city: r.city,
            avatar_url: r.avatar_url,
            role: r.role,
            favorite_categories: r.favorite_categories.0,
            favorite_events: r.favorite_events.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, full_name, phone, city, avatar_url, \
     role, favorite_categories, favorite_events, created_at, updated_at";

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, user: User) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, full_name, phone, city, avatar_url, \
             role, favorite_categories, favorite_events, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(&user.city)
        .bind(&user.avatar_url)
        .bind(&user.role)
        .bind(Json(&user.favorite_categories))
        .bind(Json(&user.favorite_events))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, &user.email))?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(User::from))
    }

    async fn update(&self, user: &User) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET full_name = $2, phone = $3, city = $4, avatar_url = $5, \
             favorite_categories = $6, favorite_events = $7, updated_at = $8 \
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(&user.city)
        .bind(&user.avatar_url)
        .bind(Json(&user.favorite_categories))
        .bind(Json(&user.favorite_events))
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/* ---------- events ---------- */

#[derive(FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    category: Option<String>,
    date: String,
    time: String,
    location: String,
    price: f64,
    capacity: Option<i32>,
    image_url: Option<String>,
    status: String,
    created_by: String,
    attendees_count: i32,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl From<EventRow> for Event {
    fn from(r: EventRow) -> Self {
        Event {
            id: r.id,
            title: r.title,
            description: r.description,
            category: r.category,
            date: r.date,
            time: r.time,
            location: r.location,
            price: r.price,
            capacity: r.capacity,
            image_url: r.image_url,
            status: r.status,
            created_by: r.created_by,
            attendees_count: r.attendees_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const EVENT_COLUMNS: &str = "id, title, description, category, date, time, location, price, \
     capacity, image_url, status, created_by, attendees_count, created_at, updated_at";

#[async_trait]
impl EventStore for PgStore {
    async fn insert(&self, event: Event) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO events (id, title, description, category, date, time, location, \
             price, capacity, image_url, status, created_by, attendees_count, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.category)
        .bind(&event.date)
        .bind(&event.time)
        .bind(&event.location)
        .bind(event.price)
        .bind(event.capacity)
        .bind(&event.image_url)
        .bind(&event.status)
        .bind(&event.created_by)
        .bind(event.attendees_count)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let row: Option<EventRow> =
            sqlx::query_as(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Event::from))
    }

    async fn update(&self, event: &Event) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE events SET title = $2, description = $3, category = $4, date = $5, \
             time = $6, location = $7, price = $8, capacity = $9, image_url = $10, \
             status = $11, attendees_count = $12, updated_at = $13 \
             WHERE id = $1",
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.category)
        .bind(&event.date)
        .bind(&event.time)
        .bind(&event.location)
        .bind(event.price)
        .bind(event.capacity)
        .bind(&event.image_url)
        .bind(&event.status)
        .bind(event.attendees_count)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }
}

/* ---------- bookings ---------- */

#[derive(FromRow)]
struct BookingRow {
    id: Uuid,
    event_id: Uuid,
    event_title: String,
    event_date: String,
    event_time: String,
    event_location: String,
    user_email: String,
    user_name: String,
    seats: Json<Vec<Seat>>,
    num_tickets: i32,
    total_price: f64,
    booking_status: String,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl TryFrom<BookingRow> for Booking {
    type Error = sqlx::Error;

    fn try_from(r: BookingRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::from_str(&r.booking_status)
            .map_err(|e| sqlx::Error::Decode(e.into()))?;
        Ok(Booking {
            id: r.id,
            event_id: r.event_id,
            event_title: r.event_title,
            event_date: r.event_date,
            event_time: r.event_time,
            event_location: r.event_location,
            user_email: r.user_email,
            user_name: r.user_name,
            seats: r.seats.0,
            num_tickets: r.num_tickets,
            total_price: r.total_price,
            booking_status: status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, event_id, event_title, event_date, event_time, event_location, \
     user_email, user_name, seats, num_tickets, total_price, booking_status, \
     created_at, updated_at";

fn into_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, StoreError> {
    rows.into_iter()
        .map(|r| Booking::try_from(r).map_err(StoreError::Database))
        .collect()
}

#[async_trait]
impl BookingStore for PgStore {
    async fn insert(&self, booking: Booking) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO bookings (id, event_id, event_title, event_date, event_time, \
             event_location, user_email, user_name, seats, num_tickets, total_price, \
             booking_status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(booking.id)
        .bind(booking.event_id)
        .bind(&booking.event_title)
        .bind(&booking.event_date)
        .bind(&booking.event_time)
        .bind(&booking.event_location)
        .bind(&booking.user_email)
        .bind(&booking.user_name)
        .bind(Json(&booking.seats))
        .bind(booking.num_tickets)
        .bind(booking.total_price)
        .bind(booking.booking_status.to_string())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Booking::try_from)
            .transpose()
            .map_err(StoreError::Database)
    }

    async fn update(&self, booking: &Booking) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE bookings SET user_name = $2, seats = $3, num_tickets = $4, \
             total_price = $5, booking_status = $6, updated_at = $7 \
             WHERE id = $1",
        )
        .bind(booking.id)
        .bind(&booking.user_name)
        .bind(Json(&booking.seats))
        .bind(booking.num_tickets)
        .bind(booking.total_price)
        .bind(booking.booking_status.to_string())
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, user_email: Option<&str>) -> Result<Vec<Booking>, StoreError> {
        let rows: Vec<BookingRow> = match user_email {
            Some(email) => {
                sqlx::query_as(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_email = $1 \
                     ORDER BY created_at, id"
                ))
                .bind(email)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at, id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        into_bookings(rows)
    }

    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE event_id = $1 \
             ORDER BY created_at, id"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        into_bookings(rows)
    }
}
