//! Booking lifecycle: creation, updates, cancellation and the derived
//! attendee counter on the event a booking points at.
//!
//! Every path that can change which seats are held runs under the
//! per-event lock from [`EventLocks`], closing the window where two
//! requests read the ledger before either writes.

use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, Seat};
use crate::store::{BookingStore, EventStore, StoreError};

use super::ledger::SeatLedger;
use super::locks::EventLocks;
use super::validator::{self, BookingRejection};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Rejected(#[from] BookingRejection),
    #[error("booking not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything a booking request carries: the seats plus the denormalized
/// event and actor snapshot captured at booking time.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub event_id: Uuid,
    pub event_title: String,
    pub event_date: String,
    pub event_time: String,
    pub event_location: String,
    pub user_email: String,
    pub user_name: String,
    pub seats: Vec<Seat>,
    pub total_price: f64,
}

/// Fields a booking update may touch. Everything else is immutable after
/// creation.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub booking_status: Option<BookingStatus>,
    pub num_tickets: Option<i32>,
    pub user_name: Option<String>,
}

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    events: Arc<dyn EventStore>,
    ledger: SeatLedger,
    locks: EventLocks,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>, events: Arc<dyn EventStore>) -> Self {
        let ledger = SeatLedger::new(store.clone());
        Self {
            store,
            events,
            ledger,
            locks: EventLocks::new(),
        }
    }

    /// Validates the request against the current ledger and persists a
    /// Confirmed booking. On rejection nothing is written and the
    /// attendee counter is untouched.
    ///
    /// A missing event is tolerated: the booking is still created and the
    /// counter adjustment becomes a no-op.
    pub async fn create_booking(&self, req: NewBooking) -> Result<Booking, BookingError> {
        let _guard = self.locks.acquire(req.event_id).await;

        let taken = self.ledger.taken_seats(req.event_id).await?;
        validator::validate(&req.seats, req.total_price, &taken)?;

        let now = Utc::now().naive_utc();
        let booking = Booking {
            id: Uuid::new_v4(),
            event_id: req.event_id,
            event_title: req.event_title,
            event_date: req.event_date,
            event_time: req.event_time,
            event_location: req.event_location,
            user_email: req.user_email,
            user_name: req.user_name,
            num_tickets: req.seats.len() as i32,
            seats: req.seats,
            total_price: req.total_price,
            booking_status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(booking.clone()).await?;
        self.sync_attendees(booking.event_id, booking.num_tickets)
            .await;

        Ok(booking)
    }

    /// Applies a patch to `booking_status`, `num_tickets` or `user_name`.
    ///
    /// A transition into Confirmed re-runs seat validation against the
    /// current ledger; a transition out of Confirmed releases the seats
    /// (the ledger filters by status) and decrements the attendee counter.
    pub async fn update_booking(
        &self,
        booking_id: Uuid,
        patch: BookingPatch,
    ) -> Result<Booking, BookingError> {
        // The event id is needed before the lock can be taken, so the
        // booking is re-read after acquisition.
        let event_id = self
            .store
            .get(booking_id)
            .await?
            .ok_or(BookingError::NotFound)?
            .event_id;

        let _guard = self.locks.acquire(event_id).await;

        let mut booking = self
            .store
            .get(booking_id)
            .await?
            .ok_or(BookingError::NotFound)?;
        let was_reserving = booking.booking_status.reserves_seats();

        if let Some(status) = patch.booking_status {
            booking.booking_status = status;
        }
        if let Some(num) = patch.num_tickets {
            if num < 0 {
                return Err(BookingRejection::MissingField("num_tickets").into());
            }
            booking.num_tickets = num;
        }
        if let Some(name) = patch.user_name {
            booking.user_name = name;
        }

        let now_reserving = booking.booking_status.reserves_seats();
        if !was_reserving && now_reserving {
            // Coming (back) into Confirmed must not collide with seats
            // confirmed while this booking was inactive. The ledger does
            // not include this booking, so no self-exclusion is needed.
            let taken = self.ledger.taken_seats(booking.event_id).await?;
            validator::validate(&booking.seats, booking.total_price, &taken)?;
        }

        booking.updated_at = Utc::now().naive_utc();
        if !self.store.update(&booking).await? {
            return Err(BookingError::NotFound);
        }

        match (was_reserving, now_reserving) {
            (false, true) => self.sync_attendees(booking.event_id, booking.num_tickets).await,
            (true, false) => {
                self.sync_attendees(booking.event_id, -booking.num_tickets)
                    .await
            }
            _ => {}
        }

        Ok(booking)
    }

    /// Cancellation is a status transition, not a removal; the booking
    /// stays in the collection as part of the historical ledger.
    pub async fn cancel_booking(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        self.update_booking(
            booking_id,
            BookingPatch {
                booking_status: Some(BookingStatus::Cancelled),
                ..BookingPatch::default()
            },
        )
        .await
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        self.store
            .get(booking_id)
            .await?
            .ok_or(BookingError::NotFound)
    }

    pub async fn list_bookings(
        &self,
        user_email: Option<&str>,
    ) -> Result<Vec<Booking>, BookingError> {
        Ok(self.store.list(user_email).await?)
    }

    /// Seats held by Confirmed bookings for the event, order-preserving.
    pub async fn get_reserved_seats(&self, event_id: Uuid) -> Result<Vec<Seat>, BookingError> {
        Ok(self.ledger.reserved_seats(event_id).await?)
    }

    /// Attendee counter sync. Applies `delta` to the event's
    /// `attendees_count`, clamped at zero.
    ///
    /// A missing event is a no-op and a persistence failure is only
    /// logged; neither ever fails the enclosing booking operation. The
    /// booking itself is already persisted at this point.
    async fn sync_attendees(&self, event_id: Uuid, delta: i32) {
        match self.events.get(event_id).await {
            Ok(Some(mut event)) => {
                event.attendees_count = (event.attendees_count + delta).max(0);
                event.updated_at = Utc::now().naive_utc();
                if let Err(e) = self.events.update(&event).await {
                    error!("attendee sync: failed to persist count for event {event_id}: {e}");
                }
            }
            Ok(None) => {
                debug!("attendee sync: event {event_id} not found, skipping");
            }
            Err(e) => {
                error!("attendee sync: failed to load event {event_id}: {e}");
            }
        }
    }
}
