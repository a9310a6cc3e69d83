//! Availability windows, occupancies, recurrence, and listing configuration.

use serde::{Deserialize, Serialize};

use crate::api::{BlockId, BookingId, ListingId, OperatorId, WindowId};
use crate::models::time::TimeInterval;

/// How a listing is booked, which determines how free intervals are sliced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingUnitType {
    /// Whole calendar days; free intervals pass through unsliced.
    Daily,
    /// Overnight stays; free intervals pass through unsliced.
    Night,
    /// Fixed-length hourly units.
    Hourly,
    /// Fixed-length appointment units.
    Appointment,
}

impl BookingUnitType {
    /// Whether free intervals are cut into fixed-duration units.
    pub fn is_granular(&self) -> bool {
        matches!(self, BookingUnitType::Hourly | BookingUnitType::Appointment)
    }
}

/// Origin of an availability window declaration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    /// Declared directly by the host.
    #[serde(alias = "default")]
    Manual,
    /// Produced by recurrence expansion.
    Recurring,
}

impl Default for SlotType {
    fn default() -> Self {
        SlotType::Manual
    }
}

/// A declared span during which a listing is, by default, bookable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: WindowId,
    pub listing_id: ListingId,
    pub interval: TimeInterval,
    pub is_available: bool,
    pub slot_type: SlotType,
    pub price_override: Option<f64>,
    pub booking_unit_type: BookingUnitType,
    pub slot_duration_minutes: Option<u32>,
}

/// A window pending insertion; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWindow {
    pub listing_id: ListingId,
    pub interval: TimeInterval,
    pub is_available: bool,
    pub slot_type: SlotType,
    pub price_override: Option<f64>,
    pub booking_unit_type: BookingUnitType,
    pub slot_duration_minutes: Option<u32>,
}

impl NewWindow {
    /// The same window re-targeted at a sibling listing, used by propagation.
    pub fn for_listing(&self, listing_id: ListingId) -> NewWindow {
        NewWindow {
            listing_id,
            ..self.clone()
        }
    }
}

/// Lifecycle status of a booking. Only pending, confirmed, and completed
/// bookings occupy availability.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Declined,
}

impl BookingStatus {
    pub fn occupies(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::Completed
        )
    }
}

/// A booking, owned by the reservation flow and read here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub listing_id: ListingId,
    pub interval: TimeInterval,
    pub status: BookingStatus,
}

/// A booking pending insertion (test fixtures and the external flow).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub listing_id: ListingId,
    pub interval: TimeInterval,
    pub status: BookingStatus,
}

/// A host-declared blocked range removing availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub listing_id: ListingId,
    pub interval: TimeInterval,
    pub reason: Option<String>,
}

/// A block pending insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBlock {
    pub listing_id: ListingId,
    pub interval: TimeInterval,
    pub reason: Option<String>,
}

/// Where an occupancy interval came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum OccupancySource {
    Booking(BookingId),
    Block(BlockId),
}

/// The logical union of a booking and a blocked range as seen by the
/// interval algebra: something that removes availability from a window.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyInterval {
    pub source: OccupancySource,
    pub interval: TimeInterval,
}

impl From<&Booking> for OccupancyInterval {
    fn from(booking: &Booking) -> Self {
        OccupancyInterval {
            source: OccupancySource::Booking(booking.id),
            interval: booking.interval,
        }
    }
}

impl From<&Block> for OccupancyInterval {
    fn from(block: &Block) -> Self {
        OccupancyInterval {
            source: OccupancySource::Block(block.id),
            interval: block.interval,
        }
    }
}

/// Recurrence pattern. Anything the caller sends that is not a recognized
/// pattern collapses to the start date only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
    #[serde(other)]
    Unrecognized,
}

/// A compact recurrence request, consumed once during expansion and never
/// persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub pattern: RecurrencePattern,
    /// Last calendar date (inclusive) a produced window may fall on.
    pub bound_end_date: chrono::NaiveDate,
}

/// One concrete dated window produced by recurrence expansion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub date: chrono::NaiveDate,
    pub interval: TimeInterval,
}

/// Read-only per-listing booking configuration.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingConfig {
    pub booking_unit_type: BookingUnitType,
    /// Default unit length for granular listings when a window does not
    /// carry its own.
    pub slot_duration_minutes: Option<u32>,
    /// Earliest bookable moment, as hours after the caller's reference time.
    pub min_advance_hours: Option<u32>,
    /// Latest bookable moment, as days after the caller's reference time.
    pub max_advance_days: Option<u32>,
}

impl ListingConfig {
    /// Unit length to slice with. A zero duration is treated as unset, so
    /// the result is always positive; the final fallback is one hour.
    pub fn effective_slot_duration(&self, window_override: Option<u32>) -> u32 {
        window_override
            .filter(|d| *d > 0)
            .or(self.slot_duration_minutes.filter(|d| *d > 0))
            .unwrap_or(60)
    }
}

/// A listing as the core sees it: its configuration plus the operator
/// identity that links sibling listings for propagation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: ListingId,
    pub operator_id: OperatorId,
    pub config: ListingConfig,
}
