//! Grouping engine: partitioning a flat list of time series headers into
//! per-location observation/simulation role assignments.

use std::collections::BTreeMap;

use crate::models::{RecordId, Timeseries};

/// The identifiers a grouping pass matches headers against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupingSpec {
    pub obs_parameter_id: Option<String>,
    pub obs_module_instance_id: Option<String>,
    pub sim_parameter_id: String,
    /// Candidate simulation module instances. Cardinality decides the
    /// simulation slot shape: one candidate records a single id, several
    /// record a per-model map.
    pub sim_module_instance_ids: Vec<String>,
}

/// Simulation role of one location: a single model or one record per model.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationIds {
    Single(RecordId),
    ByModel(BTreeMap<String, RecordId>),
}

impl SimulationIds {
    /// All record ids held by this slot.
    pub fn record_ids(&self) -> Vec<RecordId> {
        match self {
            SimulationIds::Single(id) => vec![*id],
            SimulationIds::ByModel(map) => map.values().copied().collect(),
        }
    }
}

/// Role assignments collected for one location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationEntry {
    pub observation: Option<RecordId>,
    pub simulation: Option<SimulationIds>,
}

/// Per-location role assignments, keyed by location id.
pub type Grouping = BTreeMap<String, LocationEntry>;

/// Classify every header into observation-for-its-location,
/// simulation-for-its-location, or irrelevant (dropped).
///
/// A header is an observation when its parameter and module instance both
/// equal the requested observation identifiers; it is a simulation when
/// its parameter equals the simulation parameter and its module instance is
/// one of the candidates. Duplicate assignments are not expected and not
/// detected: the last header wins.
pub fn group_headers(headers: &[Timeseries], spec: &GroupingSpec) -> Grouping {
    let multi_model = spec.sim_module_instance_ids.len() > 1;
    let mut grouping = Grouping::new();

    for ts in headers {
        let header = &ts.header;
        let is_observation = spec
            .obs_parameter_id
            .as_deref()
            .is_some_and(|p| p == header.parameter_id)
            && spec
                .obs_module_instance_id
                .as_deref()
                .is_some_and(|m| m == header.module_instance_id);
        let is_simulation = header.parameter_id == spec.sim_parameter_id
            && spec
                .sim_module_instance_ids
                .iter()
                .any(|m| *m == header.module_instance_id);

        if is_observation {
            let entry = grouping.entry(header.location_id.clone()).or_default();
            entry.observation = Some(ts.id);
        } else if is_simulation {
            let entry = grouping.entry(header.location_id.clone()).or_default();
            if multi_model {
                let map = match &mut entry.simulation {
                    Some(SimulationIds::ByModel(map)) => map,
                    _ => {
                        entry.simulation = Some(SimulationIds::ByModel(BTreeMap::new()));
                        match &mut entry.simulation {
                            Some(SimulationIds::ByModel(map)) => map,
                            _ => unreachable!("just assigned ByModel"),
                        }
                    }
                };
                map.insert(header.module_instance_id.clone(), ts.id);
            } else {
                entry.simulation = Some(SimulationIds::Single(ts.id));
            }
        }
    }

    grouping
}

/// Drop every location missing a required role.
///
/// Partial data never yields partial results: after pruning, every surviving
/// entry holds a simulation slot and, when `require_observation` is set, an
/// observation id as well. An empty grouping is a valid outcome, not an
/// error.
pub fn prune_incomplete(grouping: Grouping, require_observation: bool) -> Grouping {
    grouping
        .into_iter()
        .filter(|(_, entry)| {
            entry.simulation.is_some() && (!require_observation || entry.observation.is_some())
        })
        .collect()
}
