//! Reconciliation and cross-listing propagation.
//!
//! Two jobs live here. [`reconcile`] brings a listing's stored windows back
//! in line with its occupancies by purging windows an occupancy overlaps;
//! running it twice is a no-op. [`propagate`] fans a committed batch of
//! windows out to the listings sharing the origin's operator. Propagation is
//! best-effort and explicitly non-atomic: a sibling that conflicts or fails
//! is recorded in the report and skipped, and the origin's committed state is
//! never rolled back.

use crate::api::{ListingId, WindowId};
use crate::db::{AvailabilityWindowStore, CheckedWrite, FullRepository, ListingDirectory};
use crate::models::window::{NewWindow, OccupancyInterval};
use crate::services::error::EngineResult;

/// What happened at one linked listing during propagation.
#[derive(Debug, Clone, PartialEq)]
pub enum PropagationStatus {
    /// The whole batch was written; the new window ids are returned.
    Committed(Vec<WindowId>),
    /// At least one window collided with the sibling's occupancies; the
    /// whole batch was skipped for that sibling.
    SkippedConflict(Vec<OccupancyInterval>),
    /// The write failed outright. Never retried.
    Failed(String),
}

/// Per-sibling propagation result.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PropagationOutcome {
    pub listing_id: ListingId,
    #[serde(serialize_with = "serialize_status")]
    pub status: PropagationStatus,
}

/// Aggregate outcome of a propagation pass. Infallible by construction:
/// even a failure to enumerate siblings is folded in rather than raised.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct PropagationReport {
    pub outcomes: Vec<PropagationOutcome>,
    /// Set when the linked-listing lookup itself failed and no fan-out
    /// was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_failure: Option<String>,
}

impl PropagationReport {
    /// True when every sibling committed and the lookup succeeded.
    pub fn is_clean(&self) -> bool {
        self.lookup_failure.is_none()
            && self
                .outcomes
                .iter()
                .all(|o| matches!(o.status, PropagationStatus::Committed(_)))
    }
}

fn serialize_status<S: serde::Serializer>(
    status: &PropagationStatus,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let label = match status {
        PropagationStatus::Committed(_) => "committed",
        PropagationStatus::SkippedConflict(_) => "skipped_conflict",
        PropagationStatus::Failed(_) => "failed",
    };
    serializer.serialize_str(label)
}

/// Fan `windows` out to every listing linked to `origin` by operator.
///
/// Each sibling gets the full batch as one checked insert, so a sibling
/// either takes everything or nothing. Failures are logged and recorded,
/// never raised; the caller has already committed at the origin.
pub async fn propagate(
    repo: &dyn FullRepository,
    origin: ListingId,
    windows: &[NewWindow],
) -> PropagationReport {
    if windows.is_empty() {
        return PropagationReport::default();
    }

    let siblings = match repo.linked_listings(origin).await {
        Ok(siblings) => siblings,
        Err(err) => {
            log::warn!("propagation from listing {origin}: sibling lookup failed: {err}");
            return PropagationReport {
                outcomes: Vec::new(),
                lookup_failure: Some(err.to_string()),
            };
        }
    };

    let mut outcomes = Vec::with_capacity(siblings.len());
    for sibling in siblings {
        let batch: Vec<NewWindow> = windows.iter().map(|w| w.for_listing(sibling)).collect();
        let status = match repo.insert_windows_checked(batch).await {
            Ok(CheckedWrite::Committed(inserted)) => {
                PropagationStatus::Committed(inserted.into_iter().map(|w| w.id).collect())
            }
            Ok(CheckedWrite::Conflicted(conflicts)) => {
                log::info!(
                    "propagation from listing {origin}: listing {sibling} skipped, \
                     {} conflicting occupancy interval(s)",
                    conflicts.len()
                );
                PropagationStatus::SkippedConflict(conflicts)
            }
            Err(err) => {
                log::warn!("propagation from listing {origin}: listing {sibling} failed: {err}");
                PropagationStatus::Failed(err.to_string())
            }
        };
        outcomes.push(PropagationOutcome {
            listing_id: sibling,
            status,
        });
    }

    PropagationReport {
        outcomes,
        lookup_failure: None,
    }
}

/// Purge every stored window of `listing_id` that overlaps an active booking
/// or block, and return the ids removed.
///
/// A window that merely touches an occupancy survives. The purge is one
/// transactional repository step, so a pass either removes every stale
/// window or none, and two concurrent passes cannot trip over each other.
/// The operation is idempotent: once the overlapping windows are gone a
/// second pass finds nothing to delete.
pub async fn reconcile(
    repo: &dyn FullRepository,
    listing_id: ListingId,
) -> EngineResult<Vec<WindowId>> {
    let removed = repo.purge_overlapping_windows(listing_id).await?;
    if !removed.is_empty() {
        log::debug!(
            "reconcile listing {listing_id}: removed {} stale window(s)",
            removed.len()
        );
    }
    Ok(removed)
}
