//! Shared fixtures for integration tests.

#![allow(dead_code)]

use slotgrid::api::{BlockId, BookingId, ListingId, OperatorId};
use slotgrid::db::{
    BlockRepository, CheckedWrite, ListingDirectory, LocalRepository, ReservationRepository,
};
use slotgrid::models::time::TimeInterval;
use slotgrid::models::window::{
    BookingStatus, BookingUnitType, ListingConfig, ListingRecord, NewBlock, NewBooking,
};

pub fn interval(start: &str, end: &str) -> TimeInterval {
    TimeInterval::parse(start, end).unwrap()
}

/// Register a listing with the given unit type and default slot duration.
pub async fn seed_listing(
    repo: &LocalRepository,
    id: i64,
    operator: i64,
    booking_unit_type: BookingUnitType,
    slot_duration_minutes: Option<u32>,
) {
    repo.upsert_listing(ListingRecord {
        id: ListingId::new(id),
        operator_id: OperatorId::new(operator),
        config: ListingConfig {
            booking_unit_type,
            slot_duration_minutes,
            min_advance_hours: None,
            max_advance_days: None,
        },
    })
    .await
    .unwrap();
}

/// Register a listing with advance-booking limits.
pub async fn seed_listing_with_advance(
    repo: &LocalRepository,
    id: i64,
    operator: i64,
    booking_unit_type: BookingUnitType,
    min_advance_hours: Option<u32>,
    max_advance_days: Option<u32>,
) {
    repo.upsert_listing(ListingRecord {
        id: ListingId::new(id),
        operator_id: OperatorId::new(operator),
        config: ListingConfig {
            booking_unit_type,
            slot_duration_minutes: Some(60),
            min_advance_hours,
            max_advance_days,
        },
    })
    .await
    .unwrap();
}

pub async fn book(
    repo: &LocalRepository,
    listing: i64,
    start: &str,
    end: &str,
    status: BookingStatus,
) -> BookingId {
    repo.record_booking(NewBooking {
        listing_id: ListingId::new(listing),
        interval: interval(start, end),
        status,
    })
    .await
    .unwrap()
    .id
}

pub async fn block(repo: &LocalRepository, listing: i64, start: &str, end: &str) -> BlockId {
    match repo
        .insert_blocks_checked(vec![NewBlock {
            listing_id: ListingId::new(listing),
            interval: interval(start, end),
            reason: None,
        }])
        .await
        .unwrap()
    {
        CheckedWrite::Committed(blocks) => blocks[0].id,
        CheckedWrite::Conflicted(_) => panic!("fixture block conflicted"),
    }
}
