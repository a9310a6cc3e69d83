//! Computed bookable slots.
//!
//! Slots are ephemeral: they are derived from a window and the occupancies
//! overlapping it, returned to callers, and never persisted. Each slot is
//! fully contained in exactly one availability window and disjoint from
//! every occupancy in that window.

use serde::{Deserialize, Serialize};

use crate::api::WindowId;
use crate::models::time::TimeInterval;

/// How a slot was produced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// The whole window, untouched by any occupancy.
    Full,
    /// A remainder left after subtracting occupancies.
    Split,
    /// One fixed-duration unit cut from a free interval.
    Duration,
    /// A trailing remainder at least half a unit long.
    Partial,
}

/// Structured reference from a slot back to the window it was cut from.
///
/// Replaces string-composite slot identifiers (parent id plus suffix); the
/// segment index disambiguates multiple slots derived from one window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub window_id: WindowId,
    pub segment: u32,
    pub kind: SlotKind,
}

/// A bookable sub-interval of a window after removing occupancies and
/// applying duration slicing.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookableSlot {
    pub source: SlotRef,
    pub interval: TimeInterval,
    /// Span in whole hours, annotated for daily/night unit types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whole_hours: Option<i64>,
}

impl BookableSlot {
    pub fn new(window_id: WindowId, segment: u32, kind: SlotKind, interval: TimeInterval) -> Self {
        BookableSlot {
            source: SlotRef {
                window_id,
                segment,
                kind,
            },
            interval,
            whole_hours: None,
        }
    }

    pub fn kind(&self) -> SlotKind {
        self.source.kind
    }

    /// Re-tag with a new segment index and kind, keeping the window ref.
    pub(crate) fn retag(&self, segment: u32, kind: SlotKind) -> BookableSlot {
        BookableSlot {
            source: SlotRef {
                window_id: self.source.window_id,
                segment,
                kind,
            },
            ..*self
        }
    }
}
