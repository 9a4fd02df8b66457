//! Fixture loading for the local repository.
//!
//! A fixture directory holds one JSON file per entity collection. Every file
//! is optional: a missing file simply yields an empty collection, so partial
//! fixture sets (e.g. only time series for a calculation test) stay small.

use std::fs;
use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;

use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::{
    Filter, LevelThreshold, Location, Map, ModuleInstance, ParameterGroup, Region,
    ThresholdValueSet, Timeseries, TimeseriesParameter,
};

/// Everything a fixture directory can seed into a [`LocalRepository`].
///
/// [`LocalRepository`]: crate::db::repositories::LocalRepository
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    pub locations: Vec<Location>,
    pub filters: Vec<Filter>,
    pub maps: Vec<Map>,
    pub region: Option<Region>,
    pub parameters: Vec<TimeseriesParameter>,
    pub parameter_groups: Vec<ParameterGroup>,
    pub module_instances: Vec<ModuleInstance>,
    pub timeseries: Vec<Timeseries>,
    pub threshold_value_sets: Vec<ThresholdValueSet>,
    pub level_thresholds: Vec<LevelThreshold>,
}

impl FixtureSet {
    /// Load a fixture set from a directory of JSON files.
    pub fn from_dir(dir: impl AsRef<Path>) -> RepositoryResult<FixtureSet> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(RepositoryError::ConfigurationError(format!(
                "Fixture directory '{}' does not exist",
                dir.display()
            )));
        }

        let set = FixtureSet {
            locations: load_collection(dir, "locations.json")?,
            filters: load_collection(dir, "filters.json")?,
            maps: load_collection(dir, "maps.json")?,
            region: load_optional(dir, "region.json")?,
            parameters: load_collection(dir, "parameters.json")?,
            parameter_groups: load_collection(dir, "parameter_groups.json")?,
            module_instances: load_collection(dir, "module_instances.json")?,
            timeseries: load_collection(dir, "timeseries.json")?,
            threshold_value_sets: load_collection(dir, "threshold_value_sets.json")?,
            level_thresholds: load_collection(dir, "level_thresholds.json")?,
        };
        debug!(
            "Loaded fixtures from '{}': {} locations, {} filters, {} timeseries",
            dir.display(),
            set.locations.len(),
            set.filters.len(),
            set.timeseries.len()
        );
        Ok(set)
    }
}

/// Read a JSON array file, treating a missing file as an empty collection.
fn load_collection<T: DeserializeOwned>(dir: &Path, file: &str) -> RepositoryResult<Vec<T>> {
    Ok(load_optional(dir, file)?.unwrap_or_default())
}

/// Read a single JSON document, `None` when the file does not exist.
fn load_optional<T: DeserializeOwned>(dir: &Path, file: &str) -> RepositoryResult<Option<T>> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path).map_err(|e| {
        RepositoryError::ConnectionError(format!("Failed to read '{}': {}", path.display(), e))
    })?;
    let parsed = serde_json::from_str(&raw).map_err(|e| {
        RepositoryError::ValidationError(format!("Malformed fixture '{}': {}", path.display(), e))
    })?;
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_files_yield_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        let set = FixtureSet::from_dir(dir.path()).unwrap();
        assert!(set.locations.is_empty());
        assert!(set.timeseries.is_empty());
        assert!(set.region.is_none());
    }

    #[test]
    fn missing_directory_is_a_configuration_error() {
        let err = FixtureSet::from_dir("/nonexistent/fixtures").unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError(_)));
    }

    #[test]
    fn loads_locations_and_timeseries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("locations.json"),
            r#"[{"locationId": "loc1", "shortName": "Gauge 1", "x": 1.5, "y": 2.5}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("timeseries.json"),
            r#"[{
                "id": 7,
                "header": {
                    "moduleInstanceId": "model1",
                    "parameterId": "Q.sim",
                    "location_id": "loc1"
                },
                "filter_set": ["f1"],
                "events": [{"date": "2021-01-01", "time": "00:00:00", "value": 1.0, "flag": 0}]
            }]"#,
        )
        .unwrap();

        let set = FixtureSet::from_dir(dir.path()).unwrap();
        assert_eq!(set.locations.len(), 1);
        assert_eq!(set.locations[0].location_id, "loc1");
        assert_eq!(set.timeseries.len(), 1);
        assert_eq!(set.timeseries[0].id, 7);
        assert_eq!(set.timeseries[0].events.len(), 1);
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("filters.json"), "not json").unwrap();
        let err = FixtureSet::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
    }
}
