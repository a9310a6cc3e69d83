//! # Slotgrid Backend
//!
//! Availability and slot computation engine for a multi-tenant booking
//! marketplace.
//!
//! This crate turns a listing's declared availability windows, active
//! bookings, and blocked ranges into the set of bookable time slots, and
//! validates/persists new availability and block writes without introducing
//! double-bookings. The backend exposes a REST API via Axum for the
//! marketplace frontend.
//!
//! ## Features
//!
//! - **Interval algebra**: half-open interval subtraction with a sweep-line
//!   over occupying bookings and blocks
//! - **Duration slicing**: fixed-length bookable units for hourly and
//!   appointment listings
//! - **Recurrence expansion**: daily/weekly/monthly recurrence into concrete
//!   dated windows
//! - **Conflict detection**: strict half-open overlap tests on the write path
//! - **Reconciliation**: lazy purge of windows made stale by newer bookings
//! - **Propagation**: best-effort fan-out of new windows across listings
//!   sharing an operator
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: identifier newtypes shared across layers
//! - [`models`]: time primitives and domain records
//! - [`engine`]: pure, synchronous interval algorithms
//! - [`db`]: repository pattern and persistence contract
//! - [`services`]: high-level read/write orchestration
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Time handling
//!
//! All interval boundaries are naive local timestamps; no timezone conversion
//! happens anywhere in the crate. The wire format `YYYY-MM-DDTHH:MM:SS` is
//! converted to an internal minutes-since-epoch integer in exactly one place,
//! [`models::time`].

pub mod api;

pub mod db;
pub mod engine;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
