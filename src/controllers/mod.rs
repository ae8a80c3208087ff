pub mod auth;
pub mod bookings;
pub mod events;
pub mod uploads;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(auth::routes())
        .merge(events::routes())
        .merge(bookings::routes())
        .merge(uploads::routes())
}
