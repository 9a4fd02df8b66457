//! Data Transfer Objects for the HTTP API.
//!
//! Query-string DTOs live here; response envelopes come from [`crate::api`].
//! The query conventions are historical: boolean options take the literal
//! strings `true`/`True`, while `showStatistics` and `onlyHeaders` are
//! presence flags, and multi-value options are comma-separated.

use serde::{Deserialize, Serialize};

use crate::models::{Event, RecordId, TimeseriesHeader, TimeseriesStatistics};
use crate::services::classify::CalculationRequest;

/// Parse an explicit boolean query value. Only `true` and `True` count.
pub fn get_bool(value: Option<&str>) -> bool {
    matches!(value, Some("true") | Some("True"))
}

/// Split a comma-separated query value into its parts.
fn split_csv(value: &str) -> Vec<String> {
    value.split(',').map(str::to_string).collect()
}

/// Response for the health check endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub repository: String,
}

/// Query options for the locations listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationsQuery {
    #[serde(rename = "showAttributes")]
    pub show_attributes: Option<String>,
    #[serde(rename = "showFilters")]
    pub show_filters: Option<String>,
    pub filter: Option<String>,
}

impl LocationsQuery {
    pub fn show_attributes(&self) -> bool {
        get_bool(self.show_attributes.as_deref())
    }

    pub fn show_filters(&self) -> bool {
        get_bool(self.show_filters.as_deref())
    }
}

/// Query options for the filters listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltersQuery {
    #[serde(rename = "includePolygon")]
    pub include_polygon: Option<String>,
}

impl FiltersQuery {
    /// Polygons are included unless the option is absent or literally
    /// `false` (lowercase, as always accepted).
    pub fn include_polygon(&self) -> bool {
        match self.include_polygon.as_deref() {
            None => false,
            Some(v) => v.to_lowercase() != "false",
        }
    }
}

/// Query options for the threshold groups listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThresholdGroupsQuery {
    pub filter: Option<String>,
}

/// Query options for the timeseries listing.
///
/// `showStatistics` and `onlyHeaders` are presence flags: any value,
/// including an empty one, enables them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeseriesQuery {
    pub filter: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "showStatistics")]
    pub show_statistics: Option<String>,
    #[serde(rename = "onlyHeaders")]
    pub only_headers: Option<String>,
}

impl TimeseriesQuery {
    pub fn show_statistics(&self) -> bool {
        self.show_statistics.is_some()
    }

    pub fn only_headers(&self) -> bool {
        self.only_headers.is_some()
    }
}

/// One time series in a listing response, shaped by the query flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesDto {
    pub id: RecordId,
    pub header: TimeseriesHeader,
    #[serde(default)]
    pub filter_set: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<TimeseriesStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
}

/// Query options for the calculation endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculateQuery {
    pub filter: Option<String>,
    pub calc: Option<String>,
    pub calcs: Option<String>,
    #[serde(rename = "simParameterId")]
    pub sim_parameter_id: Option<String>,
    #[serde(rename = "obsParameterId")]
    pub obs_parameter_id: Option<String>,
    #[serde(rename = "obsModuleInstanceId")]
    pub obs_module_instance_id: Option<String>,
    #[serde(rename = "simModuleInstanceId")]
    pub sim_module_instance_id: Option<String>,
    #[serde(rename = "simModuleInstanceIds")]
    pub sim_module_instance_ids: Option<String>,
    #[serde(rename = "locationId")]
    pub location_id: Option<String>,
}

impl CalculateQuery {
    /// Split the multi-value options and hand the recognized configuration
    /// to the classifier.
    pub fn into_request(self) -> CalculationRequest {
        CalculationRequest {
            filter_id: self.filter,
            calc: self.calc,
            calcs: self.calcs.as_deref().map(split_csv),
            sim_parameter_id: self.sim_parameter_id,
            obs_parameter_id: self.obs_parameter_id,
            obs_module_instance_id: self.obs_module_instance_id,
            sim_module_instance_id: self.sim_module_instance_id,
            sim_module_instance_ids: self.sim_module_instance_ids.as_deref().map(split_csv),
            location_id: self.location_id,
        }
    }
}
