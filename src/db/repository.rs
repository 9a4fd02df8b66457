//! Repository trait and error types for hydrological data storage.
//!
//! The trait is the only seam the service and HTTP layers see; backends
//! (in-memory fixtures today, a relational store later) implement it behind
//! `Arc<dyn HydroRepository>`.

use async_trait::async_trait;

use crate::models::{
    Filter, LevelThreshold, Location, Map, ModuleInstance, ParameterGroup, RecordId, Region,
    ThresholdValueSet, Timeseries, TimeseriesParameter,
};

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Backend connection failures. Typically transient.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Query execution failures.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored data failed validation on the way in or out.
    #[error("Data validation error: {0}")]
    ValidationError(String),

    /// Configuration or initialization error.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal/unexpected errors.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// The backend did not answer within the operation deadline.
    #[error("Timeout error: {0}")]
    TimeoutError(String),
}

impl RepositoryError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RepositoryError::ConnectionError(_) | RepositoryError::TimeoutError(_)
        )
    }
}

/// Repository trait for hydrological data access.
///
/// All reads; the backend is populated out-of-band (fixtures on disk, or an
/// ingestion pipeline in front of a relational store).
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait HydroRepository: Send + Sync {
    /// Check that the backend is reachable and answering.
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Geo catalog ====================

    /// All locations, optionally restricted to the members of one filter.
    async fn list_locations(&self, filter_id: Option<&str>) -> RepositoryResult<Vec<Location>>;

    /// All configured filters.
    async fn list_filters(&self) -> RepositoryResult<Vec<Filter>>;

    /// One filter by id.
    async fn get_filter(&self, filter_id: &str) -> RepositoryResult<Filter>;

    /// All configured map definitions.
    async fn list_maps(&self) -> RepositoryResult<Vec<Map>>;

    /// System/region description block.
    async fn region(&self) -> RepositoryResult<Region>;

    // ==================== Time series catalog ====================

    /// All known time series parameters.
    async fn list_parameters(&self) -> RepositoryResult<Vec<TimeseriesParameter>>;

    /// All parameter groups.
    async fn list_parameter_groups(&self) -> RepositoryResult<Vec<ParameterGroup>>;

    /// All module instances (observation imports and model runs).
    async fn list_module_instances(&self) -> RepositoryResult<Vec<ModuleInstance>>;

    // ==================== Time series data ====================

    /// Header-only records of every series belonging to a filter. Events
    /// are never loaded here; callers follow up with [`fetch_records`].
    ///
    /// [`fetch_records`]: HydroRepository::fetch_records
    async fn fetch_headers(&self, filter_id: &str) -> RepositoryResult<Vec<Timeseries>>;

    /// Full records (events included) for a set of ids, in one round trip.
    ///
    /// Unknown ids are silently skipped; the caller decides whether a
    /// missing record is an error.
    async fn fetch_records(&self, ids: &[RecordId]) -> RepositoryResult<Vec<Timeseries>>;

    /// Data-full records matching every given identifier, in one query.
    /// Used by matrix-evaluation, which pre-filters by explicit location.
    async fn fetch_headers_by(
        &self,
        filter_id: &str,
        location_id: &str,
        module_instance_ids: &[String],
        parameter_ids: &[String],
    ) -> RepositoryResult<Vec<Timeseries>>;

    /// General listing for the timeseries endpoint. `with_events` controls
    /// whether event payloads are included.
    async fn list_timeseries(
        &self,
        filter_id: Option<&str>,
        location_id: Option<&str>,
        with_events: bool,
    ) -> RepositoryResult<Vec<Timeseries>>;

    // ==================== Thresholds ====================

    /// All threshold value sets.
    async fn list_threshold_value_sets(&self) -> RepositoryResult<Vec<ThresholdValueSet>>;

    /// All level thresholds with their group memberships.
    async fn list_level_thresholds(&self) -> RepositoryResult<Vec<LevelThreshold>>;
}
