//! Wire DTOs for the REST API.
//!
//! Domain types already carry their wire representation through serde, so
//! most DTOs here are thin envelopes adding counts, request ids, and query
//! parameter parsing.

use serde::{Deserialize, Serialize};

use crate::api::{ListingId, WindowId};
use crate::models::slot::BookableSlot;
use crate::models::window::{AvailabilityWindow, Block};
use crate::services::PropagationReport;

/// GET /health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Query parameters for the availability endpoint. `from`, `to`, and the
/// optional `reference` are naive local timestamps.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub reference: Option<String>,
}

/// GET availability response.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub listing_id: ListingId,
    pub slots: Vec<BookableSlot>,
    pub total: usize,
}

/// POST windows response. The propagation report tells the caller how far
/// the fan-out to linked listings got; the windows themselves are committed
/// regardless.
#[derive(Debug, Clone, Serialize)]
pub struct WindowWriteResponse {
    pub request_id: uuid::Uuid,
    pub windows: Vec<AvailabilityWindow>,
    pub propagation: PropagationReport,
}

/// POST blocks response.
#[derive(Debug, Clone, Serialize)]
pub struct BlockWriteResponse {
    pub blocks: Vec<Block>,
}

/// POST reconcile response.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileResponse {
    pub removed_window_ids: Vec<WindowId>,
}
