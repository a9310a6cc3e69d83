//! Repository traits: the persistence contract the core consumes.
//!
//! The interval algorithms never touch storage; everything they need is
//! loaded through these traits, and every check-then-act write goes through
//! a *checked* operation that performs the conflict test and the write
//! atomically. An implementation backed by SQL must run each checked
//! operation inside a single transaction with row-level isolation on the
//! listing; the in-memory implementation holds one lock across it. Multi-row
//! checked inserts are all-or-nothing.

use async_trait::async_trait;

use crate::api::{BlockId, BookingId, ListingId, WindowId};
use crate::db::error::RepositoryResult;
use crate::models::time::TimeInterval;
use crate::models::window::{
    AvailabilityWindow, Block, Booking, ListingConfig, ListingRecord, NewBlock, NewBooking,
    NewWindow, OccupancyInterval,
};

/// Outcome of a checked write: either every row went in, or the conflicting
/// occupancies are returned and nothing was written.
#[derive(Debug, Clone)]
pub enum CheckedWrite<T> {
    Committed(T),
    Conflicted(Vec<OccupancyInterval>),
}

/// Storage for declared availability windows.
#[async_trait]
pub trait AvailabilityWindowStore: Send + Sync {
    /// Windows of a listing overlapping `range`, ordered by start.
    async fn load_windows(
        &self,
        listing_id: ListingId,
        range: TimeInterval,
    ) -> RepositoryResult<Vec<AvailabilityWindow>>;

    /// Every window of a listing, ordered by start.
    async fn load_all_windows(
        &self,
        listing_id: ListingId,
    ) -> RepositoryResult<Vec<AvailabilityWindow>>;

    /// Delete every window of the listing that overlaps one of its active
    /// bookings or blocks, returning the removed ids. Runs as one
    /// transactional step (one lock hold, one SQL transaction) so a
    /// reconciliation pass is all-or-nothing and safe to run concurrently.
    async fn purge_overlapping_windows(
        &self,
        listing_id: ListingId,
    ) -> RepositoryResult<Vec<WindowId>>;

    /// Conflict-check `windows` against the listing's active bookings and
    /// blocks, then insert them all-or-nothing. A window identical to a
    /// stored one (same listing and interval) has its `is_available` flag
    /// updated in place instead of being duplicated. All windows must
    /// belong to one listing.
    async fn insert_windows_checked(
        &self,
        windows: Vec<NewWindow>,
    ) -> RepositoryResult<CheckedWrite<Vec<AvailabilityWindow>>>;

    /// Flip a stored window's availability flag.
    async fn set_window_availability(
        &self,
        window_id: WindowId,
        is_available: bool,
    ) -> RepositoryResult<AvailabilityWindow>;

    async fn delete_window(&self, window_id: WindowId) -> RepositoryResult<()>;
}

/// Read access to bookings, which are owned by the reservation flow.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Bookings with an occupying status (pending/confirmed/completed)
    /// overlapping `range`.
    async fn load_active_bookings(
        &self,
        listing_id: ListingId,
        range: TimeInterval,
    ) -> RepositoryResult<Vec<Booking>>;

    /// Record a booking. The reservation flow owns booking lifecycles; this
    /// entry point exists so fixtures and demos can populate the store.
    async fn record_booking(&self, booking: NewBooking) -> RepositoryResult<Booking>;
}

/// Storage for host-declared blocked ranges.
#[async_trait]
pub trait BlockRepository: Send + Sync {
    async fn load_blocks(
        &self,
        listing_id: ListingId,
        range: TimeInterval,
    ) -> RepositoryResult<Vec<Block>>;

    /// Conflict-check `blocks` against the listing's active bookings and
    /// existing blocks, then insert them all-or-nothing.
    async fn insert_blocks_checked(
        &self,
        blocks: Vec<NewBlock>,
    ) -> RepositoryResult<CheckedWrite<Vec<Block>>>;

    /// Delete a block owned by `listing_id`; not-found when the id is absent
    /// or belongs to another listing.
    async fn delete_block(&self, listing_id: ListingId, block_id: BlockId)
        -> RepositoryResult<()>;
}

/// Listing configuration and operator links.
#[async_trait]
pub trait ListingDirectory: Send + Sync {
    async fn listing_config(&self, listing_id: ListingId) -> RepositoryResult<ListingConfig>;

    /// Listings sharing the operator identity, excluding `listing_id` itself.
    async fn linked_listings(&self, listing_id: ListingId) -> RepositoryResult<Vec<ListingId>>;

    /// Create or replace a listing record. Called at bootstrap, never from
    /// request handlers.
    async fn upsert_listing(&self, record: ListingRecord) -> RepositoryResult<()>;
}

/// Everything the services layer needs, as one object-safe bound.
#[async_trait]
pub trait FullRepository:
    AvailabilityWindowStore + ReservationRepository + BlockRepository + ListingDirectory
{
    /// Storage reachability check for health endpoints.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
