//! Storage traits for the document collections the service works with.
//!
//! The running service uses the Postgres implementation; tests use the
//! in-memory store. Both behave like a document store: whole records are
//! read and written, no partial updates.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Booking, Event, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `StoreError::Duplicate` when the email is already taken.
    async fn insert(&self, user: User) -> Result<(), StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Returns false when the user does not exist.
    async fn update(&self, user: &User) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, event: Event) -> Result<(), StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Event>, StoreError>;
    async fn update(&self, event: &Event) -> Result<bool, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn list(&self) -> Result<Vec<Event>, StoreError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert(&self, booking: Booking) -> Result<(), StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;
    async fn update(&self, booking: &Booking) -> Result<bool, StoreError>;
    /// All bookings, optionally narrowed to one user's email,
    /// in creation order.
    async fn list(&self, user_email: Option<&str>) -> Result<Vec<Booking>, StoreError>;
    /// All bookings referencing the event, in creation order.
    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Booking>, StoreError>;
}
