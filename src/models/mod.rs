//! Domain model types.
//!
//! - [`time`]: naive local timestamps and half-open intervals; the single
//!   boundary adapter between the wire format and the internal integer form
//! - [`window`]: availability windows, occupancies, recurrence rules, and
//!   listing configuration
//! - [`slot`]: computed bookable slots (ephemeral, never persisted)

pub mod slot;
pub mod time;
pub mod window;

pub use slot::{BookableSlot, SlotKind, SlotRef};
pub use time::{LocalStamp, TimeError, TimeInterval, TimeOfDay};
pub use window::{
    AvailabilityWindow, Block, Booking, BookingStatus, BookingUnitType, DateWindow, ListingConfig,
    ListingRecord, NewBlock, NewBooking, NewWindow, OccupancyInterval, OccupancySource,
    RecurrencePattern, RecurrenceRule, SlotType,
};
