//! Shared application state.

use std::sync::Arc;

use crate::db::FullRepository;

/// State handed to every handler: the repository behind an `Arc` so the
/// router stays `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn FullRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self { repository }
    }
}
