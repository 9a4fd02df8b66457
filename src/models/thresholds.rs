//! Threshold entities: value sets attached to time series, level thresholds,
//! and the groups that organize them.

use serde::{Deserialize, Serialize};

/// Concrete threshold values attached to one time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdValueSet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub level_threshold_values: Vec<LevelThresholdValue>,
}

/// One (level threshold, value) pairing inside a value set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelThresholdValue {
    pub level_threshold_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// A named alert level, referenced by value sets and owned by one or more
/// threshold groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelThreshold {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "thresholdGroup")]
    pub threshold_group: Vec<ThresholdGroup>,
}

/// Grouping of level thresholds (e.g. "flooding", "drought").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdGroup {
    pub id: String,
    pub name: String,
}
