//! Write path: validate, expand, conflict-check, persist, then propagate.
//!
//! Every mutation moves through the same stages: the request is received,
//! normalized against the listing's configuration, expanded through any
//! recurrence rule, conflict-checked and persisted in one checked repository
//! operation, and finally fanned out to linked listings. Only the last stage
//! is best-effort; everything before it is all-or-nothing.

use serde::{Deserialize, Serialize};

use crate::api::{BlockId, ListingId};
use crate::db::{
    AvailabilityWindowStore, BlockRepository, CheckedWrite, FullRepository, ListingDirectory,
};
use crate::engine;
use crate::models::time::TimeInterval;
use crate::models::window::{
    AvailabilityWindow, Block, NewBlock, NewWindow, RecurrenceRule, SlotType,
};
use crate::services::error::{EngineError, EngineResult};
use crate::services::synchronizer::{propagate, PropagationReport};

/// A host's request to declare availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowRequest {
    pub interval: TimeInterval,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub slot_type: SlotType,
    #[serde(default)]
    pub price_override: Option<f64>,
    /// Per-window unit length overriding the listing default.
    #[serde(default)]
    pub slot_duration_minutes: Option<u32>,
    /// When present, the interval's times are repeated on every matching
    /// date up to the rule's bound.
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
}

fn default_true() -> bool {
    true
}

/// A host's request to block a range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRequest {
    pub interval: TimeInterval,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
}

/// Committed windows plus the outcome of the propagation pass.
///
/// Propagation trouble never fails the call: the windows are committed
/// either way, and the report says how far the fan-out got.
#[derive(Debug, Clone)]
pub struct PersistedWindows {
    pub windows: Vec<AvailabilityWindow>,
    pub propagation: PropagationReport,
}

/// Expand a request's interval through its recurrence rule, if any.
///
/// Without a rule the interval passes through unchanged. With one, the
/// interval must fit inside a single day (an end time at or before the start
/// time wraps overnight) and the bound may not precede the start date.
fn expand_intervals(
    interval: TimeInterval,
    recurrence: Option<&RecurrenceRule>,
) -> EngineResult<Vec<TimeInterval>> {
    let Some(rule) = recurrence else {
        return Ok(vec![interval]);
    };

    let start_date = interval.start.date();
    if rule.bound_end_date < start_date {
        return Err(EngineError::Validation(format!(
            "recurrence bound {} precedes start date {start_date}",
            rule.bound_end_date
        )));
    }
    if interval.duration_minutes() > 1440 {
        return Err(EngineError::Validation(
            "recurring intervals must fit within one day".to_string(),
        ));
    }

    let dated = engine::expand(
        start_date,
        interval.start.time_of_day(),
        interval.end.time_of_day(),
        rule,
    );
    Ok(dated.into_iter().map(|dw| dw.interval).collect())
}

/// Validate and persist an availability declaration, then propagate it to
/// the listings sharing the origin's operator.
///
/// The conflict check and the insert happen as one checked repository
/// operation, so a booking landing between the two cannot slip through. A
/// recurrence expands into one window per occurrence and the whole set
/// commits or none of it does.
pub async fn validate_and_persist_window(
    repo: &dyn FullRepository,
    listing_id: ListingId,
    request: WindowRequest,
) -> EngineResult<PersistedWindows> {
    log::debug!("window write for listing {listing_id}: received {}", request.interval);

    // Normalize: the listing must exist and supplies the booking unit.
    let config = repo.listing_config(listing_id).await?;
    log::debug!("window write for listing {listing_id}: normalized");

    let intervals = expand_intervals(request.interval, request.recurrence.as_ref())?;
    let slot_type = if request.recurrence.is_some() {
        SlotType::Recurring
    } else {
        request.slot_type
    };
    log::debug!(
        "window write for listing {listing_id}: expanded to {} window(s)",
        intervals.len()
    );

    let batch: Vec<NewWindow> = intervals
        .into_iter()
        .map(|interval| NewWindow {
            listing_id,
            interval,
            is_available: request.is_available,
            slot_type,
            price_override: request.price_override,
            booking_unit_type: config.booking_unit_type,
            slot_duration_minutes: request.slot_duration_minutes,
        })
        .collect();

    let windows = match repo.insert_windows_checked(batch.clone()).await? {
        CheckedWrite::Committed(windows) => windows,
        CheckedWrite::Conflicted(conflicts) => {
            log::debug!(
                "window write for listing {listing_id}: rejected, {} conflict(s)",
                conflicts.len()
            );
            return Err(EngineError::Conflict(conflicts));
        }
    };
    log::debug!(
        "window write for listing {listing_id}: persisted {} window(s)",
        windows.len()
    );

    let propagation = propagate(repo, listing_id, &batch).await;
    log::debug!(
        "window write for listing {listing_id}: synchronized across {} linked listing(s)",
        propagation.outcomes.len()
    );

    Ok(PersistedWindows {
        windows,
        propagation,
    })
}

/// Validate and persist a blocked range. Blocks never propagate; they are a
/// statement about one listing's own calendar.
pub async fn validate_and_persist_block(
    repo: &dyn FullRepository,
    listing_id: ListingId,
    request: BlockRequest,
) -> EngineResult<Vec<Block>> {
    log::debug!("block write for listing {listing_id}: received {}", request.interval);

    // The listing must exist before anything is staged.
    repo.listing_config(listing_id).await?;

    let intervals = expand_intervals(request.interval, request.recurrence.as_ref())?;
    log::debug!(
        "block write for listing {listing_id}: expanded to {} block(s)",
        intervals.len()
    );

    let batch: Vec<NewBlock> = intervals
        .into_iter()
        .map(|interval| NewBlock {
            listing_id,
            interval,
            reason: request.reason.clone(),
        })
        .collect();

    match repo.insert_blocks_checked(batch).await? {
        CheckedWrite::Committed(blocks) => {
            log::debug!(
                "block write for listing {listing_id}: persisted {} block(s)",
                blocks.len()
            );
            Ok(blocks)
        }
        CheckedWrite::Conflicted(conflicts) => {
            log::debug!(
                "block write for listing {listing_id}: rejected, {} conflict(s)",
                conflicts.len()
            );
            Err(EngineError::Conflict(conflicts))
        }
    }
}

/// Remove a block owned by the listing. Removing a block that does not
/// belong to the listing is a not-found, not a silent success.
pub async fn remove_block(
    repo: &dyn FullRepository,
    listing_id: ListingId,
    block_id: BlockId,
) -> EngineResult<()> {
    repo.delete_block(listing_id, block_id).await?;
    log::debug!("block {block_id} removed from listing {listing_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::window::RecurrencePattern;
    use chrono::NaiveDate;

    fn interval(start: &str, end: &str) -> TimeInterval {
        TimeInterval::parse(start, end).unwrap()
    }

    #[test]
    fn test_expand_without_rule_is_identity() {
        let span = interval("2024-03-01T09:00:00", "2024-03-03T17:00:00");
        let out = expand_intervals(span, None).unwrap();
        assert_eq!(out, vec![span]);
    }

    #[test]
    fn test_expand_rejects_bound_before_start() {
        let span = interval("2024-03-01T09:00:00", "2024-03-01T17:00:00");
        let rule = RecurrenceRule {
            pattern: RecurrencePattern::Daily,
            bound_end_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        assert!(matches!(
            expand_intervals(span, Some(&rule)),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn test_expand_rejects_multi_day_recurring_interval() {
        let span = interval("2024-03-01T09:00:00", "2024-03-03T17:00:00");
        let rule = RecurrenceRule {
            pattern: RecurrencePattern::Weekly,
            bound_end_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        };
        assert!(matches!(
            expand_intervals(span, Some(&rule)),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn test_expand_weekly_produces_dated_intervals() {
        let span = interval("2024-01-01T09:00:00", "2024-01-01T11:00:00");
        let rule = RecurrenceRule {
            pattern: RecurrencePattern::Weekly,
            bound_end_date: NaiveDate::from_ymd_opt(2024, 1, 22).unwrap(),
        };
        let out = expand_intervals(span, Some(&rule)).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], span);
        assert_eq!(
            out[3],
            interval("2024-01-22T09:00:00", "2024-01-22T11:00:00")
        );
    }
}
