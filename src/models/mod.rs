//! Domain model types shared across the repository, service, and HTTP layers.
//!
//! These types mirror the wire format of the hydrological data API: field
//! names are camelCase on the wire, with a couple of historical snake_case
//! exceptions preserved for compatibility (noted where they occur).

pub mod geo;
pub mod thresholds;
pub mod timeseries;

pub use geo::{
    Boundary, DatetimeDefinition, Filter, FilterListItem, Location, Map, MapExtent, Region,
    SystemInformation,
};
pub use thresholds::{LevelThreshold, LevelThresholdValue, ThresholdGroup, ThresholdValueSet};
pub use timeseries::{
    Event, ModuleInstance, ParameterGroup, RecordId, Timeseries, TimeseriesHeader,
    TimeseriesParameter, TimeseriesStatistics,
};
