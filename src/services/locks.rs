use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of per-event mutexes.
///
/// The booking flow holds an event's lock across the whole
/// read-check-write sequence (ledger read, validation, booking write,
/// attendee-count adjustment), so two requests for the same event can
/// never interleave between the ledger read and the write. Requests for
/// different events do not contend.
#[derive(Clone, Default)]
pub struct EventLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>,
}

impl EventLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, event_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = match self.inner.lock() {
                Ok(map) => map,
                // A poisoned registry only means another thread panicked
                // while inserting; the map itself is still usable.
                Err(poisoned) => poisoned.into_inner(),
            };
            map.entry(event_id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
