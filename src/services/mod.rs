//! High-level business logic.
//!
//! Services orchestrate the repository and the pure engine: the read path
//! ([`availability`]) loads windows and occupancies and turns them into
//! bookable slots; the write path ([`writes`]) validates, expands, conflict-
//! checks, and persists; [`synchronizer`] reconciles stale windows and fans
//! new windows out across linked listings.

pub mod availability;
pub mod conflict_checker;
pub mod error;
pub mod synchronizer;
pub mod writes;

pub use availability::compute_available_slots;
pub use conflict_checker::{find_listing_conflicts, has_conflict};
pub use error::{EngineError, EngineResult};
pub use synchronizer::{
    propagate, reconcile, PropagationOutcome, PropagationReport, PropagationStatus,
};
pub use writes::{
    remove_block, validate_and_persist_block, validate_and_persist_window, BlockRequest,
    PersistedWindows, WindowRequest,
};
