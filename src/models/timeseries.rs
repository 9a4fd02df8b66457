//! Time series records, their headers and events, and the parameter and
//! module-instance catalogs.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::thresholds::ThresholdValueSet;
use crate::services::metrics::round3;

/// Storage identifier of one time series record.
pub type RecordId = i64;

/// A single measured or simulated value at one point in time.
///
/// The `(date, time)` pair forms the unique temporal key within one record.
/// Uniqueness is assumed upstream and not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Time of day, `HH:MM:SS`.
    pub time: String,
    pub value: f64,
    pub flag: i64,
}

impl Event {
    /// Composite `"date time"` key used for series alignment.
    pub fn datetime_key(&self) -> String {
        format!("{} {}", self.date, self.time)
    }

    /// Parsed timestamp, `None` when the date/time strings are malformed.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.datetime_key(), "%Y-%m-%d %H:%M:%S").ok()
    }
}

/// Identity of a time series without its data.
///
/// `location_id` stays snake_case on the wire; the other fields are
/// camelCase. The historical format is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesHeader {
    #[serde(rename = "moduleInstanceId")]
    pub module_instance_id: String,
    #[serde(rename = "parameterId")]
    pub parameter_id: String,
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

/// One stored time series: header plus (possibly deferred) events.
///
/// Header-only listings and the grouping engine work on records whose
/// `events` vector is empty; the full events are fetched in a single bulk
/// query once a calculation knows which record ids it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    pub id: RecordId,
    pub header: TimeseriesHeader,
    /// Ids of the filters this series belongs to.
    #[serde(default)]
    pub filter_set: Vec<String>,
    #[serde(
        default,
        rename = "thresholdValueSets",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub threshold_value_sets: Vec<ThresholdValueSet>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Timeseries {
    /// Header-only copy with the events dropped.
    pub fn dataless(&self) -> Timeseries {
        Timeseries {
            events: Vec::new(),
            ..self.clone()
        }
    }

    /// Whether this series is a member of the given filter.
    pub fn in_filter(&self, filter_id: &str) -> bool {
        self.filter_set.iter().any(|f| f == filter_id)
    }

    /// Summary statistics over the full event sequence.
    pub fn statistics(&self) -> TimeseriesStatistics {
        let count = self.events.len();
        let mut min_value = None;
        let mut max_value = None;
        let mut sum = 0.0;
        for event in &self.events {
            sum += event.value;
            min_value = Some(min_value.map_or(event.value, |m: f64| m.min(event.value)));
            max_value = Some(max_value.map_or(event.value, |m: f64| m.max(event.value)));
        }
        let mean_value = if count > 0 {
            Some(round3(sum / count as f64))
        } else {
            None
        };

        let mut timestamps: Vec<NaiveDateTime> =
            self.events.iter().filter_map(Event::timestamp).collect();
        timestamps.sort();

        TimeseriesStatistics {
            event_count: count,
            min_value,
            max_value,
            mean_value,
            first_event: timestamps.first().map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
            last_event: timestamps.last().map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

/// Event statistics reported by the header+statistics listing variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesStatistics {
    pub event_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<String>,
}

/// Physical quantity a time series measures (e.g. discharge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesParameter {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Grouping of parameters sharing a unit and display convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterGroup {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_unit: Option<String>,
}

/// Producer of a time series: an observation import job or a simulation
/// model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleInstance {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
