//! Threshold group helpers.

use std::collections::BTreeSet;

use crate::api::{ThresholdGroupLevels, ThresholdLevelItem};
use crate::models::{LevelThreshold, Timeseries};

/// Invert the level-threshold→group relation: one entry per group, carrying
/// the level thresholds it owns. Groups appear in first-seen order; levels
/// keep the input order.
pub fn invert_threshold_levels(level_thresholds: &[LevelThreshold]) -> Vec<ThresholdGroupLevels> {
    let mut groups: Vec<ThresholdGroupLevels> = Vec::new();
    for level in level_thresholds {
        for group in &level.threshold_group {
            let entry = match groups.iter_mut().find(|g| g.id == group.id) {
                Some(existing) => existing,
                None => {
                    groups.push(ThresholdGroupLevels {
                        id: group.id.clone(),
                        name: group.name.clone(),
                        threshold_levels: Vec::new(),
                    });
                    groups.last_mut().expect("just pushed")
                }
            };
            entry.threshold_levels.push(ThresholdLevelItem {
                id: level.id.clone(),
                name: level.name.clone(),
            });
        }
    }
    groups
}

/// Level threshold ids referenced by the value sets of the given series.
///
/// Used to scope the threshold groups listing to one filter: series →
/// threshold value sets → level threshold values → level threshold ids.
pub fn referenced_level_threshold_ids(series: &[Timeseries]) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    for ts in series {
        for value_set in &ts.threshold_value_sets {
            for value in &value_set.level_threshold_values {
                ids.insert(value.level_threshold_id.clone());
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        LevelThresholdValue, ThresholdGroup, ThresholdValueSet, TimeseriesHeader,
    };

    fn level(id: &str, name: &str, groups: &[(&str, &str)]) -> LevelThreshold {
        LevelThreshold {
            id: id.into(),
            name: name.into(),
            threshold_group: groups
                .iter()
                .map(|(gid, gname)| ThresholdGroup {
                    id: (*gid).into(),
                    name: (*gname).into(),
                })
                .collect(),
        }
    }

    #[test]
    fn inversion_groups_levels_by_group() {
        let levels = vec![
            level("lt1", "warning", &[("g1", "flooding")]),
            level("lt2", "danger", &[("g1", "flooding"), ("g2", "drought")]),
        ];
        let groups = invert_threshold_levels(&levels);
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].id, "g1");
        let g1_levels: Vec<&str> = groups[0]
            .threshold_levels
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(g1_levels, vec!["lt1", "lt2"]);

        assert_eq!(groups[1].id, "g2");
        assert_eq!(groups[1].threshold_levels.len(), 1);
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let levels = vec![
            level("lt1", "a", &[("g2", "drought")]),
            level("lt2", "b", &[("g1", "flooding")]),
            level("lt3", "c", &[("g2", "drought")]),
        ];
        let groups = invert_threshold_levels(&levels);
        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["g2", "g1"]);
    }

    #[test]
    fn level_ids_are_collected_across_value_sets() {
        let ts = Timeseries {
            id: 1,
            header: TimeseriesHeader {
                module_instance_id: "m".into(),
                parameter_id: "p".into(),
                location_id: "A".into(),
                units: None,
            },
            filter_set: Vec::new(),
            threshold_value_sets: vec![ThresholdValueSet {
                id: "tvs1".into(),
                name: "defaults".into(),
                level_threshold_values: vec![
                    LevelThresholdValue {
                        level_threshold_id: "lt1".into(),
                        value: Some(1.0),
                    },
                    LevelThresholdValue {
                        level_threshold_id: "lt2".into(),
                        value: None,
                    },
                ],
            }],
            events: Vec::new(),
        };
        let ids = referenced_level_threshold_ids(&[ts]);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("lt1"));
    }
}
