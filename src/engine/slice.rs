//! Duration slicing.
//!
//! Cuts the free intervals left by subtraction into fixed-length bookable
//! units for granular unit types. Daily and night listings book whole
//! windows, so their free intervals pass through unchanged.

use crate::models::slot::{BookableSlot, SlotKind};
use crate::models::time::TimeInterval;
use crate::models::window::BookingUnitType;

/// Slice the free intervals of one window into bookable units.
///
/// For `Daily`/`Night` unit types every interval passes through unchanged,
/// annotated with its span in whole hours. For `Hourly`/`Appointment` each
/// interval shorter than one unit is discarded; otherwise consecutive
/// non-overlapping chunks of exactly `duration_minutes` are emitted left to
/// right, and a final remainder at least half a unit long is emitted once as
/// a `Partial` slot. Greedy left-aligned packing is the only strategy.
///
/// A zero `duration_minutes` performs no slicing. Callers obtain unit
/// lengths through [`crate::models::window::ListingConfig::effective_slot_duration`], which treats
/// zero as unset and never returns it.
///
/// Segment indices are reassigned sequentially across the window's output so
/// that a `SlotRef` uniquely names a slot within its window.
pub fn slice(
    free: Vec<BookableSlot>,
    duration_minutes: u32,
    unit_type: BookingUnitType,
) -> Vec<BookableSlot> {
    if !unit_type.is_granular() || duration_minutes == 0 {
        return free
            .into_iter()
            .map(|slot| BookableSlot {
                whole_hours: Some(slot.interval.duration_minutes() / 60),
                ..slot
            })
            .collect();
    }

    let duration = i64::from(duration_minutes);
    let mut slots = Vec::new();
    let mut segment = 0u32;

    for piece in free {
        if piece.interval.duration_minutes() < duration {
            continue;
        }

        let mut cursor = piece.interval.start;
        while piece.interval.end.minutes() - cursor.minutes() >= duration {
            let chunk_end = cursor.plus_minutes(duration);
            if let Ok(chunk) = TimeInterval::new(cursor, chunk_end) {
                slots.push(piece.retag(segment, SlotKind::Duration).with_interval(chunk));
                segment += 1;
            }
            cursor = chunk_end;
        }

        // Trailing remainder: kept only when at least half a unit long.
        let remainder = piece.interval.end.minutes() - cursor.minutes();
        if remainder > 0 && remainder * 2 >= duration {
            if let Ok(tail) = TimeInterval::new(cursor, piece.interval.end) {
                slots.push(piece.retag(segment, SlotKind::Partial).with_interval(tail));
                segment += 1;
            }
        }
    }

    slots
}

impl BookableSlot {
    fn with_interval(mut self, interval: TimeInterval) -> BookableSlot {
        self.interval = interval;
        self
    }
}
