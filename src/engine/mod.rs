//! Pure interval algorithms.
//!
//! Everything in this module is a synchronous, single-threaded computation
//! over in-memory lists: no storage access, no clock, no async. The services
//! layer loads data through the repository and feeds it here.
//!
//! - [`subtract`]: sweep-line subtraction of occupancies from a window
//! - [`slice`]: greedy left-aligned slicing of free intervals into units
//! - [`recurrence`]: expansion of a recurrence rule into dated windows
//! - [`conflict`]: overlap filtering against an occupancy set

pub mod conflict;
pub mod recurrence;
pub mod slice;
pub mod subtract;

pub use conflict::find_conflicts;
pub use recurrence::expand;
pub use slice::slice;
pub use subtract::subtract;
