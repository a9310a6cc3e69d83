//! Persistence layer: repository contract and backends.
//!
//! The module follows a layered architecture:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP handlers, binaries)             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services/) - availability, writes, sync  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository.rs) - Abstract Interface  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! The contract is deliberately small: load windows/bookings/blocks for a
//! range, and *checked* inserts that perform conflict test plus write as one
//! atomic step (see `repository.rs` for the isolation requirements a SQL
//! backend must meet). The raw persistence dialect is out of scope here.

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod error;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

pub use error::{ErrorContext, RepositoryError, RepositoryErrorKind, RepositoryResult};
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::{ListingSeed, RepositoryConfig, ServerSettings};
pub use repositories::LocalRepository;
pub use repository::{
    AvailabilityWindowStore, BlockRepository, CheckedWrite, FullRepository, ListingDirectory,
    ReservationRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the global repository singleton for the configured backend.
pub fn init_repository(config: &RepositoryConfig) -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo_type = config
        .repository_type()
        .map_err(|e| anyhow::Error::msg(e.to_string()))?;
    let repo = RepositoryFactory::create(repo_type);
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
