pub mod blobs;
pub mod bookings;
pub mod ledger;
pub mod locks;
pub mod validator;
