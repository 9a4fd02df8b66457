//! In-memory local repository implementation.
//!
//! Stores every collection in memory behind a single `RwLock`, making it
//! deterministic and fast for unit tests and local development. Data comes
//! in through the `store_*` helpers or a [`FixtureSet`] loaded from disk.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::db::fixtures::FixtureSet;
use crate::db::repository::{HydroRepository, RepositoryError, RepositoryResult};
use crate::models::{
    Filter, LevelThreshold, Location, Map, ModuleInstance, ParameterGroup, RecordId, Region,
    ThresholdValueSet, Timeseries, TimeseriesParameter,
};

/// In-memory local repository.
///
/// Cloning is cheap and shares the underlying data.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    locations: Vec<Location>,
    filters: Vec<Filter>,
    maps: Vec<Map>,
    region: Option<Region>,
    parameters: Vec<TimeseriesParameter>,
    parameter_groups: Vec<ParameterGroup>,
    module_instances: Vec<ModuleInstance>,
    timeseries: HashMap<RecordId, Timeseries>,
    /// Insertion order of `timeseries`, so listings stay deterministic.
    timeseries_order: Vec<RecordId>,
    threshold_value_sets: Vec<ThresholdValueSet>,
    level_thresholds: Vec<LevelThreshold>,
    is_healthy: bool,
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                is_healthy: true,
                ..Default::default()
            })),
        }
    }

    /// Create a repository seeded from a fixture set.
    pub fn from_fixtures(set: FixtureSet) -> Self {
        let repo = Self::new();
        {
            let mut data = repo.data.write().unwrap();
            data.locations = set.locations;
            data.filters = set.filters;
            data.maps = set.maps;
            data.region = set.region;
            data.parameters = set.parameters;
            data.parameter_groups = set.parameter_groups;
            data.module_instances = set.module_instances;
            data.threshold_value_sets = set.threshold_value_sets;
            data.level_thresholds = set.level_thresholds;
            for ts in set.timeseries {
                data.timeseries_order.push(ts.id);
                data.timeseries.insert(ts.id, ts);
            }
        }
        repo
    }

    /// Create a repository seeded from a fixture directory on disk.
    pub fn from_fixture_dir(dir: impl AsRef<Path>) -> RepositoryResult<Self> {
        Ok(Self::from_fixtures(FixtureSet::from_dir(dir)?))
    }

    /// Add a time series record. Re-storing an existing id replaces it.
    pub fn store_timeseries(&self, ts: Timeseries) {
        let mut data = self.data.write().unwrap();
        if !data.timeseries.contains_key(&ts.id) {
            data.timeseries_order.push(ts.id);
        }
        data.timeseries.insert(ts.id, ts);
    }

    /// Add a location to the catalog.
    pub fn store_location(&self, location: Location) {
        self.data.write().unwrap().locations.push(location);
    }

    /// Add a filter definition.
    pub fn store_filter(&self, filter: Filter) {
        self.data.write().unwrap().filters.push(filter);
    }

    /// Set the region description.
    pub fn store_region(&self, region: Region) {
        self.data.write().unwrap().region = Some(region);
    }

    /// Add a threshold value set.
    pub fn store_threshold_value_set(&self, set: ThresholdValueSet) {
        self.data.write().unwrap().threshold_value_sets.push(set);
    }

    /// Add a level threshold.
    pub fn store_level_threshold(&self, threshold: LevelThreshold) {
        self.data.write().unwrap().level_thresholds.push(threshold);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().unwrap().is_healthy = healthy;
    }

    /// Clear all data from the repository, keeping the health flag.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Number of stored time series records.
    pub fn timeseries_count(&self) -> usize {
        self.data.read().unwrap().timeseries.len()
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().unwrap().is_healthy {
            return Err(RepositoryError::ConnectionError(
                "Repository is not healthy".to_string(),
            ));
        }
        Ok(())
    }

    /// Stored records in insertion order, filtered by a predicate.
    fn select_timeseries(&self, keep: impl Fn(&Timeseries) -> bool) -> Vec<Timeseries> {
        let data = self.data.read().unwrap();
        data.timeseries_order
            .iter()
            .filter_map(|id| data.timeseries.get(id))
            .filter(|ts| keep(ts))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl HydroRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().unwrap().is_healthy)
    }

    async fn list_locations(&self, filter_id: Option<&str>) -> RepositoryResult<Vec<Location>> {
        self.check_health()?;
        let locations = self.data.read().unwrap().locations.clone();
        let Some(filter_id) = filter_id else {
            return Ok(locations);
        };
        // Filter membership lives on the series records, not the locations.
        let member_ids: Vec<String> = self
            .select_timeseries(|ts| ts.in_filter(filter_id))
            .into_iter()
            .map(|ts| ts.header.location_id)
            .collect();
        Ok(locations
            .into_iter()
            .filter(|loc| member_ids.iter().any(|id| *id == loc.location_id))
            .collect())
    }

    async fn list_filters(&self) -> RepositoryResult<Vec<Filter>> {
        self.check_health()?;
        Ok(self.data.read().unwrap().filters.clone())
    }

    async fn get_filter(&self, filter_id: &str) -> RepositoryResult<Filter> {
        self.check_health()?;
        self.data
            .read()
            .unwrap()
            .filters
            .iter()
            .find(|f| f.id == filter_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Filter '{}' not found", filter_id)))
    }

    async fn list_maps(&self) -> RepositoryResult<Vec<Map>> {
        self.check_health()?;
        Ok(self.data.read().unwrap().maps.clone())
    }

    async fn region(&self) -> RepositoryResult<Region> {
        self.check_health()?;
        self.data
            .read()
            .unwrap()
            .region
            .clone()
            .ok_or_else(|| RepositoryError::NotFound("No region configured".to_string()))
    }

    async fn list_parameters(&self) -> RepositoryResult<Vec<TimeseriesParameter>> {
        self.check_health()?;
        Ok(self.data.read().unwrap().parameters.clone())
    }

    async fn list_parameter_groups(&self) -> RepositoryResult<Vec<ParameterGroup>> {
        self.check_health()?;
        Ok(self.data.read().unwrap().parameter_groups.clone())
    }

    async fn list_module_instances(&self) -> RepositoryResult<Vec<ModuleInstance>> {
        self.check_health()?;
        Ok(self.data.read().unwrap().module_instances.clone())
    }

    async fn fetch_headers(&self, filter_id: &str) -> RepositoryResult<Vec<Timeseries>> {
        self.check_health()?;
        Ok(self
            .select_timeseries(|ts| ts.in_filter(filter_id))
            .iter()
            .map(Timeseries::dataless)
            .collect())
    }

    async fn fetch_records(&self, ids: &[RecordId]) -> RepositoryResult<Vec<Timeseries>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| data.timeseries.get(id))
            .cloned()
            .collect())
    }

    async fn fetch_headers_by(
        &self,
        filter_id: &str,
        location_id: &str,
        module_instance_ids: &[String],
        parameter_ids: &[String],
    ) -> RepositoryResult<Vec<Timeseries>> {
        self.check_health()?;
        Ok(self.select_timeseries(|ts| {
            ts.in_filter(filter_id)
                && ts.header.location_id == location_id
                && module_instance_ids
                    .iter()
                    .any(|m| *m == ts.header.module_instance_id)
                && parameter_ids.iter().any(|p| *p == ts.header.parameter_id)
        }))
    }

    async fn list_timeseries(
        &self,
        filter_id: Option<&str>,
        location_id: Option<&str>,
        with_events: bool,
    ) -> RepositoryResult<Vec<Timeseries>> {
        self.check_health()?;
        let selected = self.select_timeseries(|ts| {
            filter_id.is_none_or(|f| ts.in_filter(f))
                && location_id.is_none_or(|l| ts.header.location_id == l)
        });
        if with_events {
            Ok(selected)
        } else {
            Ok(selected.iter().map(Timeseries::dataless).collect())
        }
    }

    async fn list_threshold_value_sets(&self) -> RepositoryResult<Vec<ThresholdValueSet>> {
        self.check_health()?;
        Ok(self.data.read().unwrap().threshold_value_sets.clone())
    }

    async fn list_level_thresholds(&self) -> RepositoryResult<Vec<LevelThreshold>> {
        self.check_health()?;
        Ok(self.data.read().unwrap().level_thresholds.clone())
    }
}
