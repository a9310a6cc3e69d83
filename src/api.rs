//! Identifier newtypes shared across layers.
//!
//! Every persisted entity gets its own id type so that a window id can never
//! be passed where a booking id is expected. All types derive
//! Serialize/Deserialize for JSON serialization.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(value: i64) -> Self {
                $name(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Listing identifier (database primary key).
    ListingId
}

define_id! {
    /// Availability window identifier.
    WindowId
}

define_id! {
    /// Booking identifier. Bookings are owned by the reservation flow and
    /// only read here.
    BookingId
}

define_id! {
    /// Blocked range identifier.
    BlockId
}

define_id! {
    /// Responsible operator/provider identity shared by linked listings.
    OperatorId
}
