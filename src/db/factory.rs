//! Repository factory for dependency injection.
//!
//! Creates repository instances from runtime configuration. Only the local
//! in-memory backend exists today; the factory keeps the selection seam so a
//! relational backend can slot in behind the same trait object.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
use super::repository::{HydroRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository, optionally seeded from fixtures.
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get the repository type from the `REPOSITORY_TYPE` environment
    /// variable, defaulting to Local.
    pub fn from_env() -> Self {
        std::env::var("REPOSITORY_TYPE")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(Self::Local)
    }
}

/// Repository factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create an empty in-memory local repository.
    pub fn create_local() -> Arc<dyn HydroRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create a local repository seeded from a fixture directory.
    pub fn create_local_with_fixtures(
        dir: impl AsRef<Path>,
    ) -> RepositoryResult<Arc<dyn HydroRepository>> {
        Ok(Arc::new(LocalRepository::from_fixture_dir(dir)?))
    }

    /// Create a repository from environment configuration.
    ///
    /// `REPOSITORY_TYPE` selects the backend; for the local backend,
    /// `FIXTURES_DIR` optionally names a fixture directory to seed from.
    pub fn from_env() -> RepositoryResult<Arc<dyn HydroRepository>> {
        match RepositoryType::from_env() {
            RepositoryType::Local => match std::env::var("FIXTURES_DIR") {
                Ok(dir) if !dir.is_empty() => Self::create_local_with_fixtures(dir),
                _ => Ok(Self::create_local()),
            },
        }
    }

    /// Create a repository from a TOML configuration file.
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn HydroRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config)
    }

    /// Create a repository from the default configuration file location,
    /// falling back to environment configuration when no file exists.
    pub fn from_default_config() -> RepositoryResult<Arc<dyn HydroRepository>> {
        match RepositoryConfig::from_default_location() {
            Ok(config) => Self::from_repository_config(&config),
            Err(RepositoryError::ConfigurationError(_)) => Self::from_env(),
            Err(e) => Err(e),
        }
    }

    fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn HydroRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::ConfigurationError(format!("Invalid repository type: {}", e))
        })?;

        match repo_type {
            RepositoryType::Local => match &config.fixtures.dir {
                Some(dir) => Self::create_local_with_fixtures(dir),
                None => Ok(Self::create_local()),
            },
        }
    }
}
