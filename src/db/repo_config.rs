//! Repository configuration file support.
//!
//! Reads repository settings from a `repository.toml` file: which backend to
//! use and, for the local backend, where its fixture data lives.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub fixtures: FixtureSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Local backend fixture settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureSettings {
    /// Directory of JSON fixture files. Empty means start with no data.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;

        let config: RepositoryConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `repository.toml` in the current directory and its
    /// parent.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("repository.toml"),
            PathBuf::from("../repository.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::ConfigurationError(
            "No repository.toml found in standard locations".to_string(),
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_local_config_without_fixtures() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert!(config.fixtures.dir.is_none());
    }

    #[test]
    fn parse_local_config_with_fixture_dir() {
        let toml = r#"
[repository]
type = "local"

[fixtures]
dir = "fixtures/demo"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.fixtures.dir.as_deref(),
            Some(Path::new("fixtures/demo"))
        );
    }

    #[test]
    fn unknown_repository_type_is_rejected() {
        let toml = r#"
[repository]
type = "oracle"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert!(config.repository_type().is_err());
    }
}
