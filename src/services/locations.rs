//! Location listing helpers.

use std::collections::{BTreeSet, HashMap};

use crate::api::LocationWithFilters;
use crate::models::{Filter, Location, Timeseries};

/// Annotate each location with the filters its time series belong to.
///
/// Membership is derived from the series records: a location belongs to
/// every filter that one of its series is a member of. Locations with no
/// series get an empty filter list, not a missing key.
pub fn include_filters(
    locations: Vec<Location>,
    series: &[Timeseries],
    filters: &[Filter],
) -> Vec<LocationWithFilters> {
    let mut filter_ids_by_location: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for ts in series {
        let ids = filter_ids_by_location
            .entry(ts.header.location_id.as_str())
            .or_default();
        for filter_id in &ts.filter_set {
            ids.insert(filter_id.as_str());
        }
    }

    locations
        .into_iter()
        .map(|location| {
            let members = filter_ids_by_location
                .get(location.location_id.as_str())
                .map(|ids| {
                    filters
                        .iter()
                        .filter(|f| ids.contains(f.id.as_str()))
                        .map(Filter::to_list_item)
                        .collect()
                })
                .unwrap_or_default();
            LocationWithFilters {
                location,
                filters: Some(members),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeseriesHeader;

    fn location(id: &str) -> Location {
        Location {
            location_id: id.into(),
            short_name: format!("Gauge {}", id),
            x: 0.0,
            y: 0.0,
            attributes: None,
        }
    }

    fn filter(id: &str) -> Filter {
        Filter {
            id: id.into(),
            name: format!("Filter {}", id),
            map_extent: None,
            boundary: None,
        }
    }

    fn series(location: &str, filters: &[&str]) -> Timeseries {
        Timeseries {
            id: 1,
            header: TimeseriesHeader {
                module_instance_id: "model1".into(),
                parameter_id: "Q.sim".into(),
                location_id: location.into(),
                units: None,
            },
            filter_set: filters.iter().map(|f| f.to_string()).collect(),
            threshold_value_sets: Vec::new(),
            events: Vec::new(),
        }
    }

    #[test]
    fn locations_collect_filters_from_their_series() {
        let annotated = include_filters(
            vec![location("A"), location("B")],
            &[series("A", &["f1", "f2"]), series("A", &["f2"])],
            &[filter("f1"), filter("f2")],
        );

        let a = &annotated[0];
        let ids: Vec<&str> = a
            .filters
            .as_ref()
            .unwrap()
            .iter()
            .map(|f| f.id.as_str())
            .collect();
        assert_eq!(ids, vec!["f1", "f2"]);

        // B has no series: empty list, not a missing key.
        assert_eq!(annotated[1].filters.as_deref(), Some(&[][..]));
    }

    #[test]
    fn unknown_filter_ids_are_ignored() {
        let annotated = include_filters(
            vec![location("A")],
            &[series("A", &["ghost"])],
            &[filter("f1")],
        );
        assert!(annotated[0].filters.as_ref().unwrap().is_empty());
    }
}
