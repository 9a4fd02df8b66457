//! Series alignment: turning event sequences into time-indexed lookups and
//! intersecting their indices.
//!
//! Alignment is exact string equality on the composite `"date time"` key,
//! with no tolerance and no resampling: observation and simulation sources
//! with mismatched time formats produce a reduced or empty intersection
//! instead of an error.

use std::collections::HashMap;

use crate::models::Event;

/// Index an event sequence by its composite `"date time"` key.
///
/// Duplicate keys are not expected; the last occurrence wins.
pub fn index_events(events: &[Event]) -> HashMap<String, f64> {
    events
        .iter()
        .map(|e| (e.datetime_key(), e.value))
        .collect()
}

/// Sorted intersection of two indexed series' keys.
pub fn common_keys(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> Vec<String> {
    let mut keys: Vec<String> = a.keys().filter(|k| b.contains_key(*k)).cloned().collect();
    keys.sort();
    keys
}

/// Align two event sequences into paired value vectors over their shared
/// timestamps, in ascending key order.
///
/// An empty pair of vectors means the series are not alignable.
pub fn align(obs_events: &[Event], sim_events: &[Event]) -> (Vec<f64>, Vec<f64>) {
    let obs_index = index_events(obs_events);
    let sim_index = index_events(sim_events);
    let keys = common_keys(&obs_index, &sim_index);

    let mut obs = Vec::with_capacity(keys.len());
    let mut sim = Vec::with_capacity(keys.len());
    for key in &keys {
        obs.push(obs_index[key]);
        sim.push(sim_index[key]);
    }
    (obs, sim)
}
