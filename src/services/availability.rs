//! Read path: turn declared windows and occupancies into bookable slots.

use crate::api::ListingId;
use crate::db::{
    AvailabilityWindowStore, BlockRepository, FullRepository, ListingDirectory,
    ReservationRepository,
};
use crate::models::slot::BookableSlot;
use crate::models::time::{LocalStamp, TimeInterval};
use crate::models::window::OccupancyInterval;
use crate::engine;
use crate::services::error::EngineResult;

/// Compute the bookable slots of a listing over a query range.
///
/// For every available window overlapping the (possibly advance-clamped)
/// range, occupancies are subtracted and the free remainder is sliced
/// according to the listing's booking unit. The result is ordered by start
/// across all windows. A listing with no windows in range yields an empty
/// list, not an error.
///
/// `reference` is the caller's notion of "now" as a naive local stamp. When
/// present, the listing's advance limits clamp the range; when absent the
/// range is used as-is, so historical queries stay possible.
pub async fn compute_available_slots(
    repo: &dyn FullRepository,
    listing_id: ListingId,
    range: TimeInterval,
    reference: Option<LocalStamp>,
) -> EngineResult<Vec<BookableSlot>> {
    let config = repo.listing_config(listing_id).await?;

    let range = match reference {
        Some(now) => match clamp_to_advance(range, now, &config) {
            Some(clamped) => clamped,
            None => return Ok(Vec::new()),
        },
        None => range,
    };

    let windows = repo.load_windows(listing_id, range).await?;
    let bookings = repo.load_active_bookings(listing_id, range).await?;
    let blocks = repo.load_blocks(listing_id, range).await?;

    let occupancies: Vec<OccupancyInterval> = bookings
        .iter()
        .map(OccupancyInterval::from)
        .chain(blocks.iter().map(OccupancyInterval::from))
        .collect();

    let mut slots = Vec::new();
    for window in &windows {
        if !window.is_available {
            continue;
        }
        // Windows may extend past the query range; only the visible part
        // produces slots.
        let Some(span) = window.interval.intersect(&range) else {
            continue;
        };
        let free = engine::subtract(window.id, span, &occupancies);
        let duration = config.effective_slot_duration(window.slot_duration_minutes);
        slots.extend(engine::slice(free, duration, window.booking_unit_type));
    }

    slots.sort_by_key(|slot| (slot.interval.start, slot.interval.end));
    Ok(slots)
}

/// Intersect the query range with the listing's advance limits around the
/// reference stamp. `None` means the whole range is outside the limits.
fn clamp_to_advance(
    range: TimeInterval,
    now: LocalStamp,
    config: &crate::models::window::ListingConfig,
) -> Option<TimeInterval> {
    let earliest = now.plus_minutes(i64::from(config.min_advance_hours.unwrap_or(0)) * 60);
    let latest = config
        .max_advance_days
        .map(|days| now.plus_minutes(i64::from(days) * 1440));

    let start = range.start.max(earliest);
    let end = match latest {
        Some(latest) => range.end.min(latest),
        None => range.end,
    };
    TimeInterval::new(start, end).ok()
}
