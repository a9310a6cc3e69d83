//! Axum HTTP surface.
//!
//! Exposes the availability read path and the window/block write paths over
//! REST. Handlers are thin: they translate between wire DTOs and the
//! services layer and never contain interval logic themselves.
//!
//! Enabled by the `http-server` feature.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
