//! Geographic and catalog entities: locations, filters, boundaries, maps,
//! and the region descriptor.

use serde::{Deserialize, Serialize};

/// A gauging or forecast point with planar coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub location_id: String,
    pub short_name: String,
    pub x: f64,
    pub y: f64,
    /// Free-form location attributes, only serialized when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
}

/// A named subset of time series (by geographic or event scope).
///
/// Requests scope their time series header queries to one filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_extent: Option<MapExtent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<Boundary>,
}

impl Filter {
    /// Lightweight listing form without the polygon-bearing boundary.
    pub fn to_list_item(&self) -> FilterListItem {
        FilterListItem {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Filter listing entry without polygon data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterListItem {
    pub id: String,
    pub name: String,
}

/// Rectangular map extent in map coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapExtent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// A drawable boundary polygon with its styling.
///
/// `linecolor` and `fillcolor` are lowercase on the wire while `lineWidth` is
/// camelCase; the historical format is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    #[serde(rename = "geoDatum")]
    pub geo_datum: String,
    pub projection: String,
    pub polygon: serde_json::Value,
    #[serde(rename = "linecolor")]
    pub line_color: String,
    #[serde(rename = "lineWidth")]
    pub line_width: i32,
    #[serde(rename = "fillcolor")]
    pub fill_color: String,
}

/// Base map description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Map {
    pub geo_datum: String,
    pub projection: String,
    pub default_extent: MapExtent,
}

/// System banner information for the region descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInformation {
    pub name: String,
}

/// Timezone and display format for datetimes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatetimeDefinition {
    pub timezone: String,
    pub datetime_format: String,
}

/// Top-level region descriptor served by `/region`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub system_information: SystemInformation,
    pub datetime: DatetimeDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<Map>,
}
