//! Seat ledger: which seats are currently held for an event.

use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::Seat;
use crate::store::{BookingStore, StoreError};

/// Read-only view over the booking collection. Only Confirmed bookings
/// occupy seats; Pending and Cancelled bookings never do.
#[derive(Clone)]
pub struct SeatLedger {
    store: Arc<dyn BookingStore>,
}

impl SeatLedger {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Union of the seat sets of all Confirmed bookings for the event.
    /// An event with no confirmed bookings yields an empty set.
    pub async fn taken_seats(&self, event_id: Uuid) -> Result<HashSet<Seat>, StoreError> {
        let bookings = self.store.list_for_event(event_id).await?;
        Ok(bookings
            .iter()
            .filter(|b| b.booking_status.reserves_seats())
            .flat_map(|b| b.seats.iter().copied())
            .collect())
    }

    /// Same scan, but order-preserving: seats appear in booking-creation
    /// order, then in the order they were requested within each booking.
    /// No defensive re-dedup; under the ledger invariant duplicates
    /// cannot occur across Confirmed bookings.
    pub async fn reserved_seats(&self, event_id: Uuid) -> Result<Vec<Seat>, StoreError> {
        let bookings = self.store.list_for_event(event_id).await?;
        Ok(bookings
            .iter()
            .filter(|b| b.booking_status.reserves_seats())
            .flat_map(|b| b.seats.iter().copied())
            .collect())
    }
}
