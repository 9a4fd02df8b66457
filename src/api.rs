//! Data Transfer Objects for API responses.
//!
//! The wire format is versioned and historically grown: most listing
//! endpoints wrap their payload in an envelope carrying `version` (and for
//! geographic payloads `geoDatum`), while a few endpoints serve bare arrays.
//! Key spellings are part of the contract and preserved exactly, including
//! the snake_case `threshold_levels` inside threshold groups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{
    Filter, FilterListItem, Location, ParameterGroup, RecordId, ThresholdValueSet,
    TimeseriesParameter,
};

/// Version tag attached to enveloped responses.
pub const API_VERSION: &str = "1.25";

/// Geographic datum of all served coordinates.
pub const GEO_DATUM: &str = "WGS 1984";

// ==================== Geo envelopes ====================

/// A location, optionally annotated with the filters its series belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationWithFilters {
    #[serde(flatten)]
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterListItem>>,
}

/// Envelope for the locations listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub version: String,
    #[serde(rename = "geoDatum")]
    pub geo_datum: String,
    pub locations: Vec<LocationWithFilters>,
}

impl LocationsResponse {
    pub fn new(locations: Vec<LocationWithFilters>) -> Self {
        Self {
            version: API_VERSION.to_string(),
            geo_datum: GEO_DATUM.to_string(),
            locations,
        }
    }
}

/// Envelope for the polygon-bearing filters listing.
///
/// The payload key has always been `locations` even though it carries
/// filters; clients depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiltersWithPolygonResponse {
    pub version: String,
    pub locations: Vec<Filter>,
}

impl FiltersWithPolygonResponse {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self {
            version: API_VERSION.to_string(),
            locations: filters,
        }
    }
}

// ==================== Catalog envelopes ====================

/// Envelope for the parameters listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametersResponse {
    pub version: String,
    #[serde(rename = "timeSeriesParameters")]
    pub time_series_parameters: Vec<TimeseriesParameter>,
}

impl ParametersResponse {
    pub fn new(parameters: Vec<TimeseriesParameter>) -> Self {
        Self {
            version: API_VERSION.to_string(),
            time_series_parameters: parameters,
        }
    }
}

/// Envelope for the parameter groups listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterGroupsResponse {
    pub version: String,
    #[serde(rename = "parameterGroups")]
    pub parameter_groups: Vec<ParameterGroup>,
}

impl ParameterGroupsResponse {
    pub fn new(groups: Vec<ParameterGroup>) -> Self {
        Self {
            version: API_VERSION.to_string(),
            parameter_groups: groups,
        }
    }
}

// ==================== Threshold envelopes ====================

/// A level threshold stripped of its group memberships, as nested inside
/// [`ThresholdGroupLevels`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLevelItem {
    pub id: String,
    pub name: String,
}

/// One threshold group with the level thresholds it owns: the inverse of the
/// stored level-threshold→group relation. `threshold_levels` stays
/// snake_case on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdGroupLevels {
    pub id: String,
    pub name: String,
    pub threshold_levels: Vec<ThresholdLevelItem>,
}

/// Envelope for the threshold value sets listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdValueSetsResponse {
    pub version: String,
    #[serde(rename = "thresholdValueSets")]
    pub threshold_value_sets: Vec<ThresholdValueSet>,
}

impl ThresholdValueSetsResponse {
    pub fn new(sets: Vec<ThresholdValueSet>) -> Self {
        Self {
            version: API_VERSION.to_string(),
            threshold_value_sets: sets,
        }
    }
}

/// Envelope for the threshold groups listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdGroupsResponse {
    pub version: String,
    #[serde(rename = "thresholdGroups")]
    pub threshold_groups: Vec<ThresholdGroupLevels>,
}

impl ThresholdGroupsResponse {
    pub fn new(groups: Vec<ThresholdGroupLevels>) -> Self {
        Self {
            version: API_VERSION.to_string(),
            threshold_groups: groups,
        }
    }
}

// ==================== Calculation results ====================

/// Per-model score map, keyed by simulation module instance id.
pub type ModelScores = BTreeMap<String, Option<f64>>;

/// One scored location in evaluation mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationEntry {
    #[serde(rename = "obsTimeseriesId")]
    pub obs_timeseries_id: RecordId,
    #[serde(rename = "simTimeseriesId")]
    pub sim_timeseries_id: RecordId,
    pub value: Option<f64>,
}

/// One scored location in competition mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionEntry {
    #[serde(rename = "obsTimeseriesId")]
    pub obs_timeseries_id: RecordId,
    #[serde(rename = "simTimeseriesIds")]
    pub sim_timeseries_ids: BTreeMap<String, RecordId>,
    pub values: ModelScores,
}

/// One scored location in comparison mode (no observation pairing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    #[serde(rename = "simTimeseriesIds")]
    pub sim_timeseries_ids: BTreeMap<String, RecordId>,
    pub values: ModelScores,
}

/// One location's scores, shaped per mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationScores {
    Evaluation(EvaluationEntry),
    Competition(CompetitionEntry),
    Comparison(ComparisonEntry),
}

/// Result of the per-location modes: one metric applied across locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerLocationData {
    pub metric: String,
    pub locations: BTreeMap<String, LocationScores>,
}

/// Result of matrix-evaluation: metric name over model id, for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixData {
    #[serde(rename = "locationId")]
    pub location_id: String,
    #[serde(rename = "obsTimeseriesId")]
    pub obs_timeseries_id: RecordId,
    pub metrics: BTreeMap<String, ModelScores>,
}

/// Payload of a successful calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalculationData {
    PerLocation(PerLocationData),
    Matrix(MatrixData),
}

/// Versioned calculation envelope. The payload sits under the mode name,
/// e.g. `{"version": "1.25", "evaluation": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub version: String,
    #[serde(flatten)]
    pub body: BTreeMap<String, CalculationData>,
}

impl CalculationResponse {
    pub fn new(mode: impl ToString, data: CalculationData) -> Self {
        let mut body = BTreeMap::new();
        body.insert(mode.to_string(), data);
        Self {
            version: API_VERSION.to_string(),
            body,
        }
    }
}

/// Error payload for every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
