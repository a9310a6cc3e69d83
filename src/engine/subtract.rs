//! Interval subtraction.
//!
//! Given one availability window span and the occupancies overlapping it,
//! produce the disjoint free remainder as bookable slots.

use crate::api::WindowId;
use crate::models::slot::{BookableSlot, SlotKind};
use crate::models::time::TimeInterval;
use crate::models::window::OccupancyInterval;

/// Subtract `occupancies` from `span`, returning the free remainder in
/// ascending order.
///
/// Occupancies that do not overlap the span are ignored. The sweep keeps a
/// pointer at the end of the last consumed occupancy and advances it with
/// `max`, which is what makes overlapping and nested occupancies come out
/// right without merging them first. When nothing overlaps, the whole span
/// is emitted as a single `Full` slot; otherwise every emitted piece is
/// `Split`. Zero-length pieces are dropped by construction.
pub fn subtract(
    window_id: WindowId,
    span: TimeInterval,
    occupancies: &[OccupancyInterval],
) -> Vec<BookableSlot> {
    let mut overlapping: Vec<&OccupancyInterval> = occupancies
        .iter()
        .filter(|occ| occ.interval.overlaps(&span))
        .collect();

    if overlapping.is_empty() {
        return vec![BookableSlot::new(window_id, 0, SlotKind::Full, span)];
    }

    overlapping.sort_by_key(|occ| occ.interval.start);

    let mut slots = Vec::new();
    let mut segment = 0u32;
    let mut pointer = span.start;

    for occ in overlapping {
        if pointer < occ.interval.start {
            // Safe: pointer < occ.start, so the piece is non-empty.
            if let Ok(free) = TimeInterval::new(pointer, occ.interval.start.min(span.end)) {
                slots.push(BookableSlot::new(window_id, segment, SlotKind::Split, free));
                segment += 1;
            }
        }
        pointer = pointer.max(occ.interval.end);
    }

    if pointer < span.end {
        if let Ok(free) = TimeInterval::new(pointer, span.end) {
            slots.push(BookableSlot::new(window_id, segment, SlotKind::Split, free));
        }
    }

    slots
}
