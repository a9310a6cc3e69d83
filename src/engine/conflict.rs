//! Conflict filtering.
//!
//! The overlap predicate itself lives on [`TimeInterval::overlaps`]; this
//! module applies it to an occupancy set, honoring the booking-id exclusion
//! used when revalidating an existing booking's own slot.

use std::collections::HashSet;

use crate::api::BookingId;
use crate::models::time::TimeInterval;
use crate::models::window::{OccupancyInterval, OccupancySource};

/// The subset of `occupancies` conflicting with `candidate` under the strict
/// half-open test. Empty means no conflict. Occupancies whose source booking
/// is in `exclude` are not considered.
pub fn find_conflicts(
    candidate: &TimeInterval,
    occupancies: &[OccupancyInterval],
    exclude: &HashSet<BookingId>,
) -> Vec<OccupancyInterval> {
    occupancies
        .iter()
        .filter(|occ| match occ.source {
            OccupancySource::Booking(id) => !exclude.contains(&id),
            OccupancySource::Block(_) => true,
        })
        .filter(|occ| occ.interval.overlaps(candidate))
        .copied()
        .collect()
}
