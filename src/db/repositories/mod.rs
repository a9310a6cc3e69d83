//! Repository implementations.
//!
//! Currently one backend: `local`, an in-memory implementation used for unit
//! testing, local development, and as the reference implementation of the
//! checked-write semantics a SQL backend must provide transactionally.

pub mod local;

pub use local::LocalRepository;
