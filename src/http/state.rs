//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::HydroRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for data access
    pub repository: Arc<dyn HydroRepository>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn HydroRepository>) -> Self {
        Self { repository }
    }
}
