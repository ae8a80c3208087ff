pub mod user;
pub mod event;
pub mod seat;
pub mod booking;

pub use user::User;
pub use event::Event;
pub use seat::Seat;
pub use booking::{Booking, BookingStatus};
