//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to one endpoint and delegates to the services
//! layer.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    AvailabilityQuery, AvailabilityResponse, BlockWriteResponse, HealthResponse,
    ReconcileResponse, WindowWriteResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{BlockId, ListingId};
use crate::models::time::{LocalStamp, TimeInterval};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Liveness plus a storage reachability check.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let database = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {e}"),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database,
    }))
}

/// GET /v1/listings/{listing_id}/availability?from=..&to=..&reference=..
///
/// Bookable slots of a listing over a half-open query range, ordered by
/// start. `reference` opts into the listing's advance-booking clamp.
pub async fn get_availability(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> HandlerResult<AvailabilityResponse> {
    let listing_id = ListingId::new(listing_id);
    let range = TimeInterval::parse(&query.from, &query.to)?;
    let reference = match &query.reference {
        Some(raw) => Some(LocalStamp::parse(raw)?),
        None => None,
    };

    let slots =
        services::compute_available_slots(state.repository.as_ref(), listing_id, range, reference)
            .await?;
    let total = slots.len();

    Ok(Json(AvailabilityResponse {
        listing_id,
        slots,
        total,
    }))
}

/// POST /v1/listings/{listing_id}/windows
///
/// Declare availability, optionally recurring. 201 on commit; 409 with the
/// conflicting occupancy set when the declaration collides with bookings or
/// blocks. Partial propagation to linked listings still returns 201; the
/// body's report carries the per-listing outcomes.
pub async fn create_windows(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    Json(request): Json<services::WindowRequest>,
) -> Result<(StatusCode, Json<WindowWriteResponse>), AppError> {
    let listing_id = ListingId::new(listing_id);
    let persisted =
        services::validate_and_persist_window(state.repository.as_ref(), listing_id, request)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(WindowWriteResponse {
            request_id: uuid::Uuid::new_v4(),
            windows: persisted.windows,
            propagation: persisted.propagation,
        }),
    ))
}

/// POST /v1/listings/{listing_id}/blocks
///
/// Block a range, optionally recurring. 201 on commit, 409 with the
/// conflicting set otherwise.
pub async fn create_blocks(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    Json(request): Json<services::BlockRequest>,
) -> Result<(StatusCode, Json<BlockWriteResponse>), AppError> {
    let listing_id = ListingId::new(listing_id);
    let blocks =
        services::validate_and_persist_block(state.repository.as_ref(), listing_id, request)
            .await?;

    Ok((StatusCode::CREATED, Json(BlockWriteResponse { blocks })))
}

/// DELETE /v1/listings/{listing_id}/blocks/{block_id}
///
/// Remove a block the listing owns. 404 when the block is absent or owned
/// by another listing.
pub async fn delete_block(
    State(state): State<AppState>,
    Path((listing_id, block_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    services::remove_block(
        state.repository.as_ref(),
        ListingId::new(listing_id),
        BlockId::new(block_id),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/listings/{listing_id}/reconcile
///
/// Purge stored windows that overlap the listing's live occupancies.
/// Idempotent; a second call removes nothing.
pub async fn reconcile_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
) -> HandlerResult<ReconcileResponse> {
    let removed =
        services::reconcile(state.repository.as_ref(), ListingId::new(listing_id)).await?;
    Ok(Json(ReconcileResponse {
        removed_window_ids: removed,
    }))
}
