//! End-to-end booking lifecycle scenarios over the in-memory store.

mod common;

use common::{booking_request, seat, seed_event, test_app};
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use uuid::Uuid;

use event_booking::models::{BookingStatus, Seat};
use event_booking::services::bookings::{BookingError, BookingPatch};
use event_booking::services::validator::BookingRejection;

#[tokio::test]
async fn booking_a_free_seat_succeeds_and_counts_attendees() {
    let app = test_app();
    let event = seed_event(&app, "Rust Meetup").await;
    let email: String = SafeEmail().fake();

    let booking = app
        .service
        .create_booking(booking_request(&event, &email, vec![seat(1, 1), seat(1, 2)], 40.0))
        .await
        .unwrap();

    assert_eq!(booking.booking_status, BookingStatus::Confirmed);
    assert_eq!(booking.num_tickets, 2);
    assert_eq!(booking.event_title, "Rust Meetup");
    assert_eq!(booking.user_email, email);

    let reserved = app.service.get_reserved_seats(event.id).await.unwrap();
    assert_eq!(reserved, vec![seat(1, 1), seat(1, 2)]);

    let stored_event = app.events.get(event.id).await.unwrap().unwrap();
    assert_eq!(stored_event.attendees_count, 2);
}

#[tokio::test]
async fn booking_a_taken_seat_is_rejected_with_the_conflicting_seat() {
    let app = test_app();
    let event = seed_event(&app, "Jazz Night").await;

    app.service
        .create_booking(booking_request(&event, "first@example.com", vec![seat(3, 5)], 20.0))
        .await
        .unwrap();

    let err = app
        .service
        .create_booking(booking_request(&event, "second@example.com", vec![seat(3, 5)], 20.0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BookingError::Rejected(BookingRejection::SeatTaken(s)) if s == seat(3, 5)
    ));

    // No booking was persisted and the counter did not move.
    let bookings = app.service.list_bookings(Some("second@example.com")).await.unwrap();
    assert!(bookings.is_empty());
    let stored_event = app.events.get(event.id).await.unwrap().unwrap();
    assert_eq!(stored_event.attendees_count, 1);
}

#[tokio::test]
async fn empty_seat_list_is_rejected_and_nothing_changes() {
    let app = test_app();
    let event = seed_event(&app, "Standup").await;

    let err = app
        .service
        .create_booking(booking_request(&event, "user@example.com", vec![], 10.0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BookingError::Rejected(BookingRejection::MissingField("seats"))
    ));

    let stored_event = app.events.get(event.id).await.unwrap().unwrap();
    assert_eq!(stored_event.attendees_count, 0);
    assert!(app.service.list_bookings(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_seat_within_one_request_is_rejected() {
    let app = test_app();
    let event = seed_event(&app, "Opera").await;

    let err = app
        .service
        .create_booking(booking_request(&event, "user@example.com", vec![seat(2, 2), seat(2, 2)], 20.0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BookingError::Rejected(BookingRejection::DuplicateInRequest(s)) if s == seat(2, 2)
    ));
}

#[tokio::test]
async fn booking_against_a_missing_event_still_succeeds() {
    let app = test_app();
    let event = seed_event(&app, "Ghost Show").await;
    let missing_id = Uuid::new_v4();

    // Valid seats and price, but the event id points nowhere: the booking
    // is created and the counter sync quietly does nothing.
    let booking = app
        .service
        .create_booking(common::request_for_event_id(
            missing_id,
            &event,
            "user@example.com",
            vec![seat(0, 0)],
            10.0,
        ))
        .await
        .unwrap();

    assert_eq!(booking.event_id, missing_id);
    let fetched = app.service.get_booking(booking.id).await.unwrap();
    assert_eq!(fetched.booking_status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn reserved_seats_read_is_idempotent_and_order_preserving() {
    let app = test_app();
    let event = seed_event(&app, "Ballet").await;

    app.service
        .create_booking(booking_request(&event, "a@example.com", vec![seat(1, 1), seat(1, 2)], 40.0))
        .await
        .unwrap();
    app.service
        .create_booking(booking_request(&event, "b@example.com", vec![seat(0, 5)], 20.0))
        .await
        .unwrap();

    let first = app.service.get_reserved_seats(event.id).await.unwrap();
    let second = app.service.get_reserved_seats(event.id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, vec![seat(1, 1), seat(1, 2), seat(0, 5)]);
}

#[tokio::test]
async fn reserved_seats_for_an_unknown_event_is_empty_not_an_error() {
    let app = test_app();
    let reserved = app.service.get_reserved_seats(Uuid::new_v4()).await.unwrap();
    assert!(reserved.is_empty());
}

#[tokio::test]
async fn cancelling_releases_seats_and_decrements_the_counter() {
    let app = test_app();
    let event = seed_event(&app, "Cinema").await;

    let booking = app
        .service
        .create_booking(booking_request(&event, "user@example.com", vec![seat(4, 4), seat(4, 5)], 30.0))
        .await
        .unwrap();
    assert_eq!(app.events.get(event.id).await.unwrap().unwrap().attendees_count, 2);

    let cancelled = app.service.cancel_booking(booking.id).await.unwrap();
    assert_eq!(cancelled.booking_status, BookingStatus::Cancelled);

    // Seats are free again, the counter is back down, and the booking
    // record itself survives as history.
    assert!(app.service.get_reserved_seats(event.id).await.unwrap().is_empty());
    assert_eq!(app.events.get(event.id).await.unwrap().unwrap().attendees_count, 0);
    assert_eq!(
        app.service.get_booking(booking.id).await.unwrap().booking_status,
        BookingStatus::Cancelled
    );

    // The freed seat can be booked by someone else.
    app.service
        .create_booking(booking_request(&event, "other@example.com", vec![seat(4, 4)], 15.0))
        .await
        .unwrap();
}

#[tokio::test]
async fn reconfirming_a_cancelled_booking_revalidates_seats() {
    let app = test_app();
    let event = seed_event(&app, "Circus").await;

    let booking = app
        .service
        .create_booking(booking_request(&event, "user@example.com", vec![seat(2, 3)], 15.0))
        .await
        .unwrap();
    app.service.cancel_booking(booking.id).await.unwrap();

    // Someone else grabs the seat while the booking is cancelled.
    app.service
        .create_booking(booking_request(&event, "rival@example.com", vec![seat(2, 3)], 15.0))
        .await
        .unwrap();

    let err = app
        .service
        .update_booking(
            booking.id,
            BookingPatch {
                booking_status: Some(BookingStatus::Confirmed),
                ..BookingPatch::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BookingError::Rejected(BookingRejection::SeatTaken(s)) if s == seat(2, 3)
    ));
}

#[tokio::test]
async fn update_patches_only_the_allowed_fields() {
    let app = test_app();
    let event = seed_event(&app, "Lecture").await;

    let booking = app
        .service
        .create_booking(booking_request(&event, "user@example.com", vec![seat(7, 7)], 10.0))
        .await
        .unwrap();

    let updated = app
        .service
        .update_booking(
            booking.id,
            BookingPatch {
                user_name: Some("Renamed Attendee".to_string()),
                num_tickets: Some(3),
                booking_status: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.user_name, "Renamed Attendee");
    assert_eq!(updated.num_tickets, 3);
    // Everything outside the patch whitelist is untouched.
    assert_eq!(updated.seats, booking.seats);
    assert_eq!(updated.event_title, booking.event_title);
    assert_eq!(updated.total_price, booking.total_price);
    assert_eq!(updated.booking_status, BookingStatus::Confirmed);
    assert!(updated.updated_at >= booking.updated_at);
}

#[tokio::test]
async fn negative_num_tickets_patch_is_rejected() {
    let app = test_app();
    let event = seed_event(&app, "Workshop").await;

    let booking = app
        .service
        .create_booking(booking_request(&event, "user@example.com", vec![seat(1, 9)], 10.0))
        .await
        .unwrap();

    let err = app
        .service
        .update_booking(
            booking.id,
            BookingPatch {
                num_tickets: Some(-1),
                ..BookingPatch::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::Rejected(_)));
}

#[tokio::test]
async fn updating_an_unknown_booking_is_not_found() {
    let app = test_app();

    let err = app
        .service
        .update_booking(Uuid::new_v4(), BookingPatch::default())
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::NotFound));
}

#[tokio::test]
async fn listing_filters_by_user_email() {
    let app = test_app();
    let event = seed_event(&app, "Festival").await;

    app.service
        .create_booking(booking_request(&event, "alice@example.com", vec![seat(1, 1)], 10.0))
        .await
        .unwrap();
    app.service
        .create_booking(booking_request(&event, "bob@example.com", vec![seat(1, 2)], 10.0))
        .await
        .unwrap();
    app.service
        .create_booking(booking_request(&event, "alice@example.com", vec![seat(1, 3)], 10.0))
        .await
        .unwrap();

    let alices = app.service.list_bookings(Some("alice@example.com")).await.unwrap();
    assert_eq!(alices.len(), 2);
    assert!(alices.iter().all(|b| b.user_email == "alice@example.com"));

    let all = app.service.list_bookings(None).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn attendee_counter_never_goes_negative() {
    let app = test_app();
    let mut event = seed_event(&app, "Edge Case").await;

    let booking = app
        .service
        .create_booking(booking_request(&event, "user@example.com", vec![seat(0, 1)], 10.0))
        .await
        .unwrap();

    // Counter drifted low out-of-band (e.g. a direct event edit).
    event = app.events.get(event.id).await.unwrap().unwrap();
    event.attendees_count = 0;
    app.events.update(&event).await.unwrap();

    app.service.cancel_booking(booking.id).await.unwrap();

    let stored = app.events.get(event.id).await.unwrap().unwrap();
    assert_eq!(stored.attendees_count, 0);
}

#[tokio::test]
async fn snapshot_fields_survive_later_event_edits() {
    let app = test_app();
    let event = seed_event(&app, "Original Title").await;

    let booking = app
        .service
        .create_booking(booking_request(&event, "user@example.com", vec![seat(5, 5)], 10.0))
        .await
        .unwrap();

    let mut edited = app.events.get(event.id).await.unwrap().unwrap();
    edited.title = "Renamed Title".to_string();
    app.events.update(&edited).await.unwrap();

    let fetched = app.service.get_booking(booking.id).await.unwrap();
    assert_eq!(fetched.event_title, "Original Title");
}

#[tokio::test]
async fn first_colliding_seat_is_reported_in_request_order() {
    let app = test_app();
    let event = seed_event(&app, "Theatre").await;

    app.service
        .create_booking(booking_request(
            &event,
            "holder@example.com",
            vec![seat(1, 1), seat(1, 2)],
            20.0,
        ))
        .await
        .unwrap();

    // Both requested seats collide; the first in request order wins.
    let err = app
        .service
        .create_booking(booking_request(
            &event,
            "late@example.com",
            vec![seat(1, 2), seat(1, 1)],
            20.0,
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BookingError::Rejected(BookingRejection::SeatTaken(s)) if s == seat(1, 2)
    ));
}

#[tokio::test]
async fn invalid_seat_coordinates_are_rejected() {
    let app = test_app();
    let event = seed_event(&app, "Underground").await;

    let err = app
        .service
        .create_booking(booking_request(&event, "user@example.com", vec![Seat::new(-1, 3)], 10.0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BookingError::Rejected(BookingRejection::InvalidSeat(s)) if s == Seat::new(-1, 3)
    ));
}
