//! Router configuration for the HTTP API.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Build the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS for development; restrict in deployment.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route(
            "/listings/{listing_id}/availability",
            get(handlers::get_availability),
        )
        .route(
            "/listings/{listing_id}/windows",
            post(handlers::create_windows),
        )
        .route(
            "/listings/{listing_id}/blocks",
            post(handlers::create_blocks),
        )
        .route(
            "/listings/{listing_id}/blocks/{block_id}",
            delete(handlers::delete_block),
        )
        .route(
            "/listings/{listing_id}/reconcile",
            post(handlers::reconcile_listing),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
