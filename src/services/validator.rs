//! Booking request validation.
//!
//! Pure checks over the request and a ledger snapshot; no side effects.

use std::collections::HashSet;
use thiserror::Error;

use crate::models::Seat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BookingRejection {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("seat {0} is not a valid seat")]
    InvalidSeat(Seat),
    #[error("seat {0} appears more than once in the request")]
    DuplicateInRequest(Seat),
    #[error("seat {0} is already taken")]
    SeatTaken(Seat),
}

/// Checks run in a fixed order:
///
/// 1. seats non-empty, price present and non-negative
/// 2. every seat structurally valid (row >= 0, column >= 0)
/// 3. no seat requested twice
/// 4. no requested seat already held on the ledger
///
/// Seats are checked in request order, so the first offending seat is
/// the one reported.
pub fn validate(
    seats: &[Seat],
    total_price: f64,
    taken: &HashSet<Seat>,
) -> Result<(), BookingRejection> {
    if seats.is_empty() {
        return Err(BookingRejection::MissingField("seats"));
    }
    if !total_price.is_finite() || total_price < 0.0 {
        return Err(BookingRejection::MissingField("total_price"));
    }

    for seat in seats {
        if !seat.is_valid() {
            return Err(BookingRejection::InvalidSeat(*seat));
        }
    }

    let mut seen = HashSet::with_capacity(seats.len());
    for seat in seats {
        if !seen.insert(*seat) {
            return Err(BookingRejection::DuplicateInRequest(*seat));
        }
    }

    for seat in seats {
        if taken.contains(seat) {
            return Err(BookingRejection::SeatTaken(*seat));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(row: i32, column: i32) -> Seat {
        Seat::new(row, column)
    }

    #[test]
    fn accepts_a_clean_request() {
        let taken = HashSet::new();
        assert_eq!(validate(&[seat(1, 1), seat(1, 2)], 40.0, &taken), Ok(()));
    }

    #[test]
    fn rejects_empty_seat_list() {
        let taken = HashSet::new();
        assert_eq!(
            validate(&[], 10.0, &taken),
            Err(BookingRejection::MissingField("seats"))
        );
    }

    #[test]
    fn rejects_negative_and_non_finite_price() {
        let taken = HashSet::new();
        assert_eq!(
            validate(&[seat(0, 0)], -1.0, &taken),
            Err(BookingRejection::MissingField("total_price"))
        );
        assert_eq!(
            validate(&[seat(0, 0)], f64::NAN, &taken),
            Err(BookingRejection::MissingField("total_price"))
        );
    }

    #[test]
    fn rejects_negative_coordinates() {
        let taken = HashSet::new();
        assert_eq!(
            validate(&[seat(2, 2), seat(-1, 4)], 10.0, &taken),
            Err(BookingRejection::InvalidSeat(seat(-1, 4)))
        );
        assert_eq!(
            validate(&[seat(3, -2)], 10.0, &taken),
            Err(BookingRejection::InvalidSeat(seat(3, -2)))
        );
    }

    #[test]
    fn rejects_duplicate_within_request() {
        let taken = HashSet::new();
        assert_eq!(
            validate(&[seat(2, 2), seat(2, 2)], 10.0, &taken),
            Err(BookingRejection::DuplicateInRequest(seat(2, 2)))
        );
    }

    #[test]
    fn rejects_taken_seat() {
        let taken: HashSet<Seat> = [seat(3, 5)].into_iter().collect();
        assert_eq!(
            validate(&[seat(3, 5)], 10.0, &taken),
            Err(BookingRejection::SeatTaken(seat(3, 5)))
        );
    }

    #[test]
    fn reports_first_collision_in_request_order() {
        let taken: HashSet<Seat> = [seat(1, 2), seat(1, 1)].into_iter().collect();
        // Both seats collide; the first one in the request wins.
        assert_eq!(
            validate(&[seat(1, 1), seat(1, 2)], 10.0, &taken),
            Err(BookingRejection::SeatTaken(seat(1, 1)))
        );
    }

    #[test]
    fn structural_checks_run_before_collision_check() {
        let taken: HashSet<Seat> = [seat(2, 2)].into_iter().collect();
        // (2,2) is taken, but the duplicate pair is reported first.
        assert_eq!(
            validate(&[seat(2, 2), seat(2, 2)], 10.0, &taken),
            Err(BookingRejection::DuplicateInRequest(seat(2, 2)))
        );
    }
}
