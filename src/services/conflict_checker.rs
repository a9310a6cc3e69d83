//! Conflict checks against a listing's live occupancy set.

use std::collections::HashSet;

use crate::api::{BookingId, ListingId};
use crate::db::{BlockRepository, FullRepository, ReservationRepository};
use crate::engine;
use crate::models::time::TimeInterval;
use crate::models::window::OccupancyInterval;
use crate::services::error::EngineResult;

/// Load a listing's active bookings and blocks overlapping `candidate` and
/// return the subset that conflicts with it.
///
/// `exclude` removes specific bookings from consideration, which lets a
/// modification flow re-check a booking's own new dates without colliding
/// with itself. Blocks are never excluded.
pub async fn find_listing_conflicts(
    repo: &dyn FullRepository,
    listing_id: ListingId,
    candidate: &TimeInterval,
    exclude: &HashSet<BookingId>,
) -> EngineResult<Vec<OccupancyInterval>> {
    let bookings = repo.load_active_bookings(listing_id, *candidate).await?;
    let blocks = repo.load_blocks(listing_id, *candidate).await?;

    let occupancies: Vec<OccupancyInterval> = bookings
        .iter()
        .map(OccupancyInterval::from)
        .chain(blocks.iter().map(OccupancyInterval::from))
        .collect();

    Ok(engine::find_conflicts(candidate, &occupancies, exclude))
}

/// Whether `candidate` overlaps any active booking or block of the listing.
///
/// Touching intervals do not conflict: a stay ending at 11:00 and one
/// starting at 11:00 coexist.
pub async fn has_conflict(
    repo: &dyn FullRepository,
    listing_id: ListingId,
    candidate: &TimeInterval,
    exclude: &HashSet<BookingId>,
) -> EngineResult<bool> {
    let conflicts = find_listing_conflicts(repo, listing_id, candidate, exclude).await?;
    Ok(!conflicts.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperatorId;
    use crate::db::{ListingDirectory, LocalRepository};
    use crate::models::window::{
        BookingStatus, BookingUnitType, ListingConfig, ListingRecord, NewBooking,
    };

    async fn seeded_repo() -> LocalRepository {
        let repo = LocalRepository::new();
        repo.upsert_listing(ListingRecord {
            id: ListingId::new(1),
            operator_id: OperatorId::new(10),
            config: ListingConfig {
                booking_unit_type: BookingUnitType::Daily,
                slot_duration_minutes: None,
                min_advance_hours: None,
                max_advance_days: None,
            },
        })
        .await
        .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_overlap_is_detected() {
        let repo = seeded_repo().await;
        repo.record_booking(NewBooking {
            listing_id: ListingId::new(1),
            interval: TimeInterval::parse("2024-03-01T10:00:00", "2024-03-01T11:00:00").unwrap(),
            status: BookingStatus::Confirmed,
        })
        .await
        .unwrap();

        let candidate =
            TimeInterval::parse("2024-03-01T10:30:00", "2024-03-01T12:00:00").unwrap();
        assert!(has_conflict(&repo, ListingId::new(1), &candidate, &HashSet::new())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_touching_booking_is_not_a_conflict() {
        let repo = seeded_repo().await;
        repo.record_booking(NewBooking {
            listing_id: ListingId::new(1),
            interval: TimeInterval::parse("2024-03-01T09:00:00", "2024-03-01T10:00:00").unwrap(),
            status: BookingStatus::Confirmed,
        })
        .await
        .unwrap();

        let candidate =
            TimeInterval::parse("2024-03-01T10:00:00", "2024-03-01T11:00:00").unwrap();
        assert!(!has_conflict(&repo, ListingId::new(1), &candidate, &HashSet::new())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_excluded_booking_can_move_within_itself() {
        let repo = seeded_repo().await;
        let booking = repo
            .record_booking(NewBooking {
                listing_id: ListingId::new(1),
                interval: TimeInterval::parse("2024-03-01T10:00:00", "2024-03-01T12:00:00")
                    .unwrap(),
                status: BookingStatus::Confirmed,
            })
            .await
            .unwrap();

        let candidate =
            TimeInterval::parse("2024-03-01T11:00:00", "2024-03-01T13:00:00").unwrap();
        let exclude: HashSet<BookingId> = [booking.id].into_iter().collect();

        let conflicts = find_listing_conflicts(&repo, ListingId::new(1), &candidate, &exclude)
            .await
            .unwrap();
        assert!(conflicts.is_empty());
    }
}
