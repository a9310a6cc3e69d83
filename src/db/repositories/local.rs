//! In-memory repository.
//!
//! All state lives behind one `parking_lot::Mutex`, so every checked write
//! (conflict test plus insert) runs under a single lock acquisition. That is
//! the in-memory equivalent of the single-transaction requirement a SQL
//! backend must meet: two concurrent requests against the same listing can
//! never both pass the conflict check and both write overlapping rows.
//! Multi-row inserts are staged and applied only after every row has been
//! checked, so they are all-or-nothing by construction.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::api::{BlockId, BookingId, ListingId, WindowId};
use crate::db::error::{ErrorContext, RepositoryError, RepositoryResult};
use crate::db::repository::{
    AvailabilityWindowStore, BlockRepository, CheckedWrite, FullRepository, ListingDirectory,
    ReservationRepository,
};
use crate::engine::find_conflicts;
use crate::models::time::TimeInterval;
use crate::models::window::{
    AvailabilityWindow, Block, Booking, ListingConfig, ListingRecord, NewBlock, NewBooking,
    NewWindow, OccupancyInterval,
};

#[derive(Default)]
struct Inner {
    listings: HashMap<ListingId, ListingRecord>,
    windows: BTreeMap<WindowId, AvailabilityWindow>,
    bookings: BTreeMap<BookingId, Booking>,
    blocks: BTreeMap<BlockId, Block>,
    next_window_id: i64,
    next_booking_id: i64,
    next_block_id: i64,
}

impl Inner {
    fn require_listing(&self, listing_id: ListingId, operation: &str) -> RepositoryResult<()> {
        if self.listings.contains_key(&listing_id) {
            Ok(())
        } else {
            Err(RepositoryError::not_found(format!(
                "Listing {} does not exist",
                listing_id
            ))
            .with_context(
                ErrorContext::new(operation)
                    .with_entity("listing")
                    .with_entity_id(listing_id),
            ))
        }
    }

    /// Active bookings and blocks of a listing as occupancy intervals.
    fn occupancies(&self, listing_id: ListingId) -> Vec<OccupancyInterval> {
        let mut occupancies: Vec<OccupancyInterval> = self
            .bookings
            .values()
            .filter(|b| b.listing_id == listing_id && b.status.occupies())
            .map(OccupancyInterval::from)
            .collect();
        occupancies.extend(
            self.blocks
                .values()
                .filter(|b| b.listing_id == listing_id)
                .map(OccupancyInterval::from),
        );
        occupancies
    }

    fn windows_sorted(&self, listing_id: ListingId) -> Vec<AvailabilityWindow> {
        let mut windows: Vec<AvailabilityWindow> = self
            .windows
            .values()
            .filter(|w| w.listing_id == listing_id)
            .cloned()
            .collect();
        windows.sort_by_key(|w| w.interval.start);
        windows
    }
}

/// In-memory implementation of the full repository contract.
#[derive(Default)]
pub struct LocalRepository {
    inner: Mutex<Inner>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AvailabilityWindowStore for LocalRepository {
    async fn load_windows(
        &self,
        listing_id: ListingId,
        range: TimeInterval,
    ) -> RepositoryResult<Vec<AvailabilityWindow>> {
        let inner = self.inner.lock();
        inner.require_listing(listing_id, "load_windows")?;
        Ok(inner
            .windows_sorted(listing_id)
            .into_iter()
            .filter(|w| w.interval.overlaps(&range))
            .collect())
    }

    async fn load_all_windows(
        &self,
        listing_id: ListingId,
    ) -> RepositoryResult<Vec<AvailabilityWindow>> {
        let inner = self.inner.lock();
        inner.require_listing(listing_id, "load_all_windows")?;
        Ok(inner.windows_sorted(listing_id))
    }

    async fn purge_overlapping_windows(
        &self,
        listing_id: ListingId,
    ) -> RepositoryResult<Vec<WindowId>> {
        let mut inner = self.inner.lock();
        inner.require_listing(listing_id, "purge_overlapping_windows")?;

        // Collect then delete under the same lock hold; the purge is one
        // atomic step and a concurrent pass sees either all rows or none.
        let occupancies = inner.occupancies(listing_id);
        let mut doomed: Vec<WindowId> = inner
            .windows
            .values()
            .filter(|w| {
                w.listing_id == listing_id
                    && occupancies.iter().any(|occ| w.interval.overlaps(&occ.interval))
            })
            .map(|w| w.id)
            .collect();
        doomed.sort();
        for id in &doomed {
            inner.windows.remove(id);
        }
        Ok(doomed)
    }

    async fn insert_windows_checked(
        &self,
        windows: Vec<NewWindow>,
    ) -> RepositoryResult<CheckedWrite<Vec<AvailabilityWindow>>> {
        let Some(first) = windows.first() else {
            return Ok(CheckedWrite::Committed(Vec::new()));
        };
        let listing_id = first.listing_id;
        if windows.iter().any(|w| w.listing_id != listing_id) {
            return Err(RepositoryError::validation(
                "insert_windows_checked requires a single listing per batch",
            )
            .with_operation("insert_windows_checked"));
        }

        let mut inner = self.inner.lock();
        inner.require_listing(listing_id, "insert_windows_checked")?;

        // Check every row before touching state; all-or-nothing.
        let occupancies = inner.occupancies(listing_id);
        let mut seen = HashSet::new();
        let mut conflicts = Vec::new();
        for window in &windows {
            for conflict in find_conflicts(&window.interval, &occupancies, &HashSet::new()) {
                if seen.insert(conflict.source) {
                    conflicts.push(conflict);
                }
            }
        }
        if !conflicts.is_empty() {
            conflicts.sort_by_key(|c| c.interval.start);
            return Ok(CheckedWrite::Conflicted(conflicts));
        }

        let mut affected = Vec::with_capacity(windows.len());
        for window in windows {
            let existing = inner
                .windows
                .values()
                .find(|w| w.listing_id == listing_id && w.interval == window.interval)
                .map(|w| w.id);
            if let Some(id) = existing {
                // Identical window: update the flag in place, no duplicate.
                if let Some(stored) = inner.windows.get_mut(&id) {
                    stored.is_available = window.is_available;
                    affected.push(stored.clone());
                }
            } else {
                inner.next_window_id += 1;
                let stored = AvailabilityWindow {
                    id: WindowId::new(inner.next_window_id),
                    listing_id,
                    interval: window.interval,
                    is_available: window.is_available,
                    slot_type: window.slot_type,
                    price_override: window.price_override,
                    booking_unit_type: window.booking_unit_type,
                    slot_duration_minutes: window.slot_duration_minutes,
                };
                inner.windows.insert(stored.id, stored.clone());
                affected.push(stored);
            }
        }

        Ok(CheckedWrite::Committed(affected))
    }

    async fn set_window_availability(
        &self,
        window_id: WindowId,
        is_available: bool,
    ) -> RepositoryResult<AvailabilityWindow> {
        let mut inner = self.inner.lock();
        let window = inner.windows.get_mut(&window_id).ok_or_else(|| {
            RepositoryError::not_found(format!("Window {} does not exist", window_id))
                .with_context(
                    ErrorContext::new("set_window_availability")
                        .with_entity("window")
                        .with_entity_id(window_id),
                )
        })?;
        window.is_available = is_available;
        Ok(window.clone())
    }

    async fn delete_window(&self, window_id: WindowId) -> RepositoryResult<()> {
        let mut inner = self.inner.lock();
        inner.windows.remove(&window_id).ok_or_else(|| {
            RepositoryError::not_found(format!("Window {} does not exist", window_id))
                .with_context(
                    ErrorContext::new("delete_window")
                        .with_entity("window")
                        .with_entity_id(window_id),
                )
        })?;
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for LocalRepository {
    async fn load_active_bookings(
        &self,
        listing_id: ListingId,
        range: TimeInterval,
    ) -> RepositoryResult<Vec<Booking>> {
        let inner = self.inner.lock();
        inner.require_listing(listing_id, "load_active_bookings")?;
        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| {
                b.listing_id == listing_id && b.status.occupies() && b.interval.overlaps(&range)
            })
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.interval.start);
        Ok(bookings)
    }

    async fn record_booking(&self, booking: NewBooking) -> RepositoryResult<Booking> {
        let mut inner = self.inner.lock();
        inner.require_listing(booking.listing_id, "record_booking")?;
        inner.next_booking_id += 1;
        let stored = Booking {
            id: BookingId::new(inner.next_booking_id),
            listing_id: booking.listing_id,
            interval: booking.interval,
            status: booking.status,
        };
        inner.bookings.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl BlockRepository for LocalRepository {
    async fn load_blocks(
        &self,
        listing_id: ListingId,
        range: TimeInterval,
    ) -> RepositoryResult<Vec<Block>> {
        let inner = self.inner.lock();
        inner.require_listing(listing_id, "load_blocks")?;
        let mut blocks: Vec<Block> = inner
            .blocks
            .values()
            .filter(|b| b.listing_id == listing_id && b.interval.overlaps(&range))
            .cloned()
            .collect();
        blocks.sort_by_key(|b| b.interval.start);
        Ok(blocks)
    }

    async fn insert_blocks_checked(
        &self,
        blocks: Vec<NewBlock>,
    ) -> RepositoryResult<CheckedWrite<Vec<Block>>> {
        let Some(first) = blocks.first() else {
            return Ok(CheckedWrite::Committed(Vec::new()));
        };
        let listing_id = first.listing_id;
        if blocks.iter().any(|b| b.listing_id != listing_id) {
            return Err(RepositoryError::validation(
                "insert_blocks_checked requires a single listing per batch",
            )
            .with_operation("insert_blocks_checked"));
        }

        let mut inner = self.inner.lock();
        inner.require_listing(listing_id, "insert_blocks_checked")?;

        let occupancies = inner.occupancies(listing_id);
        let mut seen = HashSet::new();
        let mut conflicts = Vec::new();
        for block in &blocks {
            for conflict in find_conflicts(&block.interval, &occupancies, &HashSet::new()) {
                if seen.insert(conflict.source) {
                    conflicts.push(conflict);
                }
            }
        }
        if !conflicts.is_empty() {
            conflicts.sort_by_key(|c| c.interval.start);
            return Ok(CheckedWrite::Conflicted(conflicts));
        }

        let mut stored_blocks = Vec::with_capacity(blocks.len());
        for block in blocks {
            inner.next_block_id += 1;
            let stored = Block {
                id: BlockId::new(inner.next_block_id),
                listing_id,
                interval: block.interval,
                reason: block.reason,
            };
            inner.blocks.insert(stored.id, stored.clone());
            stored_blocks.push(stored);
        }

        Ok(CheckedWrite::Committed(stored_blocks))
    }

    async fn delete_block(
        &self,
        listing_id: ListingId,
        block_id: BlockId,
    ) -> RepositoryResult<()> {
        let mut inner = self.inner.lock();
        let owned = inner
            .blocks
            .get(&block_id)
            .is_some_and(|b| b.listing_id == listing_id);
        if !owned {
            return Err(RepositoryError::not_found(format!(
                "Block {} does not exist for listing {}",
                block_id, listing_id
            ))
            .with_context(
                ErrorContext::new("delete_block")
                    .with_entity("block")
                    .with_entity_id(block_id),
            ));
        }
        inner.blocks.remove(&block_id);
        Ok(())
    }
}

#[async_trait]
impl ListingDirectory for LocalRepository {
    async fn listing_config(&self, listing_id: ListingId) -> RepositoryResult<ListingConfig> {
        let inner = self.inner.lock();
        inner
            .listings
            .get(&listing_id)
            .map(|record| record.config)
            .ok_or_else(|| {
                RepositoryError::not_found(format!("Listing {} does not exist", listing_id))
                    .with_context(
                        ErrorContext::new("listing_config")
                            .with_entity("listing")
                            .with_entity_id(listing_id),
                    )
            })
    }

    async fn linked_listings(&self, listing_id: ListingId) -> RepositoryResult<Vec<ListingId>> {
        let inner = self.inner.lock();
        let operator = inner
            .listings
            .get(&listing_id)
            .map(|record| record.operator_id)
            .ok_or_else(|| {
                RepositoryError::not_found(format!("Listing {} does not exist", listing_id))
                    .with_context(
                        ErrorContext::new("linked_listings")
                            .with_entity("listing")
                            .with_entity_id(listing_id),
                    )
            })?;
        let mut siblings: Vec<ListingId> = inner
            .listings
            .values()
            .filter(|record| record.operator_id == operator && record.id != listing_id)
            .map(|record| record.id)
            .collect();
        siblings.sort();
        Ok(siblings)
    }

    async fn upsert_listing(&self, record: ListingRecord) -> RepositoryResult<()> {
        let mut inner = self.inner.lock();
        inner.listings.insert(record.id, record);
        Ok(())
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        // Lock acquisition is the only failure mode the local backend has.
        let _inner = self.inner.lock();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::window::{BookingStatus, BookingUnitType, SlotType};

    fn listing(id: i64, operator: i64) -> ListingRecord {
        ListingRecord {
            id: ListingId::new(id),
            operator_id: crate::api::OperatorId::new(operator),
            config: ListingConfig {
                booking_unit_type: BookingUnitType::Hourly,
                slot_duration_minutes: Some(60),
                min_advance_hours: None,
                max_advance_days: None,
            },
        }
    }

    fn window(listing_id: i64, start: &str, end: &str) -> NewWindow {
        NewWindow {
            listing_id: ListingId::new(listing_id),
            interval: TimeInterval::parse(start, end).unwrap(),
            is_available: true,
            slot_type: SlotType::Manual,
            price_override: None,
            booking_unit_type: BookingUnitType::Hourly,
            slot_duration_minutes: Some(60),
        }
    }

    #[tokio::test]
    async fn test_unknown_listing_is_not_found() {
        let repo = LocalRepository::new();
        let err = repo
            .load_all_windows(ListingId::new(404))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_checked_insert_commits_when_clear() {
        let repo = LocalRepository::new();
        repo.upsert_listing(listing(1, 10)).await.unwrap();

        let outcome = repo
            .insert_windows_checked(vec![window(1, "2024-03-01T09:00:00", "2024-03-01T17:00:00")])
            .await
            .unwrap();

        match outcome {
            CheckedWrite::Committed(windows) => {
                assert_eq!(windows.len(), 1);
                assert_eq!(windows[0].id, WindowId::new(1));
            }
            CheckedWrite::Conflicted(_) => panic!("expected commit"),
        }
    }

    #[tokio::test]
    async fn test_checked_insert_reports_conflicts_and_writes_nothing() {
        let repo = LocalRepository::new();
        repo.upsert_listing(listing(1, 10)).await.unwrap();
        repo.record_booking(NewBooking {
            listing_id: ListingId::new(1),
            interval: TimeInterval::parse("2024-03-02T10:00:00", "2024-03-02T11:00:00").unwrap(),
            status: BookingStatus::Confirmed,
        })
        .await
        .unwrap();

        let outcome = repo
            .insert_windows_checked(vec![
                window(1, "2024-03-01T09:00:00", "2024-03-01T17:00:00"),
                window(1, "2024-03-02T09:00:00", "2024-03-02T17:00:00"),
            ])
            .await
            .unwrap();

        assert!(matches!(outcome, CheckedWrite::Conflicted(ref c) if c.len() == 1));
        // All-or-nothing: the conflict-free first row was not inserted either.
        assert!(repo
            .load_all_windows(ListingId::new(1))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_identical_window_updates_flag_in_place() {
        let repo = LocalRepository::new();
        repo.upsert_listing(listing(1, 10)).await.unwrap();

        let first = window(1, "2024-03-01T09:00:00", "2024-03-01T17:00:00");
        repo.insert_windows_checked(vec![first.clone()]).await.unwrap();

        let mut flipped = first;
        flipped.is_available = false;
        repo.insert_windows_checked(vec![flipped]).await.unwrap();

        let windows = repo.load_all_windows(ListingId::new(1)).await.unwrap();
        assert_eq!(windows.len(), 1);
        assert!(!windows[0].is_available);
    }

    #[tokio::test]
    async fn test_set_window_availability_flips_flag() {
        let repo = LocalRepository::new();
        repo.upsert_listing(listing(1, 10)).await.unwrap();

        let outcome = repo
            .insert_windows_checked(vec![window(1, "2024-03-01T09:00:00", "2024-03-01T17:00:00")])
            .await
            .unwrap();
        let window_id = match outcome {
            CheckedWrite::Committed(windows) => windows[0].id,
            CheckedWrite::Conflicted(_) => panic!("expected commit"),
        };

        let updated = repo.set_window_availability(window_id, false).await.unwrap();
        assert!(!updated.is_available);

        let err = repo
            .set_window_availability(WindowId::new(999), true)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_window() {
        let repo = LocalRepository::new();
        repo.upsert_listing(listing(1, 10)).await.unwrap();

        let outcome = repo
            .insert_windows_checked(vec![window(1, "2024-03-01T09:00:00", "2024-03-01T17:00:00")])
            .await
            .unwrap();
        let window_id = match outcome {
            CheckedWrite::Committed(windows) => windows[0].id,
            CheckedWrite::Conflicted(_) => panic!("expected commit"),
        };

        repo.delete_window(window_id).await.unwrap();
        assert!(repo.delete_window(window_id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_purge_removes_only_overlapping_windows() {
        let repo = LocalRepository::new();
        repo.upsert_listing(listing(1, 10)).await.unwrap();
        repo.insert_windows_checked(vec![
            window(1, "2024-03-01T09:00:00", "2024-03-01T17:00:00"),
            window(1, "2024-03-02T09:00:00", "2024-03-02T17:00:00"),
        ])
        .await
        .unwrap();
        repo.record_booking(NewBooking {
            listing_id: ListingId::new(1),
            interval: TimeInterval::parse("2024-03-01T10:00:00", "2024-03-01T11:00:00").unwrap(),
            status: BookingStatus::Confirmed,
        })
        .await
        .unwrap();

        let removed = repo
            .purge_overlapping_windows(ListingId::new(1))
            .await
            .unwrap();
        assert_eq!(removed.len(), 1);

        let remaining = repo.load_all_windows(ListingId::new(1)).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(
            remaining[0].interval,
            TimeInterval::parse("2024-03-02T09:00:00", "2024-03-02T17:00:00").unwrap()
        );
    }

    #[tokio::test]
    async fn test_cancelled_bookings_do_not_occupy() {
        let repo = LocalRepository::new();
        repo.upsert_listing(listing(1, 10)).await.unwrap();
        repo.record_booking(NewBooking {
            listing_id: ListingId::new(1),
            interval: TimeInterval::parse("2024-03-01T10:00:00", "2024-03-01T11:00:00").unwrap(),
            status: BookingStatus::Cancelled,
        })
        .await
        .unwrap();

        let range = TimeInterval::parse("2024-03-01T00:00:00", "2024-03-02T00:00:00").unwrap();
        assert!(repo
            .load_active_bookings(ListingId::new(1), range)
            .await
            .unwrap()
            .is_empty());

        let outcome = repo
            .insert_blocks_checked(vec![NewBlock {
                listing_id: ListingId::new(1),
                interval: TimeInterval::parse("2024-03-01T10:00:00", "2024-03-01T11:00:00")
                    .unwrap(),
                reason: None,
            }])
            .await
            .unwrap();
        assert!(matches!(outcome, CheckedWrite::Committed(_)));
    }

    #[tokio::test]
    async fn test_delete_block_checks_ownership() {
        let repo = LocalRepository::new();
        repo.upsert_listing(listing(1, 10)).await.unwrap();
        repo.upsert_listing(listing(2, 10)).await.unwrap();

        let outcome = repo
            .insert_blocks_checked(vec![NewBlock {
                listing_id: ListingId::new(1),
                interval: TimeInterval::parse("2024-03-01T09:00:00", "2024-03-01T10:00:00")
                    .unwrap(),
                reason: Some("maintenance".to_string()),
            }])
            .await
            .unwrap();
        let block_id = match outcome {
            CheckedWrite::Committed(blocks) => blocks[0].id,
            CheckedWrite::Conflicted(_) => panic!("expected commit"),
        };

        let err = repo
            .delete_block(ListingId::new(2), block_id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        repo.delete_block(ListingId::new(1), block_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_linked_listings_share_operator() {
        let repo = LocalRepository::new();
        repo.upsert_listing(listing(1, 10)).await.unwrap();
        repo.upsert_listing(listing(2, 10)).await.unwrap();
        repo.upsert_listing(listing(3, 99)).await.unwrap();

        let siblings = repo.linked_listings(ListingId::new(1)).await.unwrap();
        assert_eq!(siblings, vec![ListingId::new(2)]);
    }
}
