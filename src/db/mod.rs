//! Data access for hydrological entities via the Repository pattern.
//!
//! The module is layered: the [`repository::HydroRepository`] trait is the
//! abstract interface, `repositories::local` is the in-memory implementation
//! seeded from JSON fixtures, and `factory` selects and constructs a backend
//! from runtime configuration. A process-wide singleton is kept for the HTTP
//! server; tests construct their own instances instead.

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod fixtures;
pub mod repo_config;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
pub use fixtures::FixtureSet;
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
pub use repository::{HydroRepository, RepositoryError, RepositoryResult};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn HydroRepository>> = OnceLock::new();

/// Initialize the global repository singleton from configuration.
///
/// Reads `repository.toml` from the standard locations, falling back to
/// environment variables. Idempotent: later calls are no-ops.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = RepositoryFactory::from_default_config()
        .map_err(|e| anyhow::Error::msg(e.to_string()))?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn HydroRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = init_repository();
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
