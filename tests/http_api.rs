//! HTTP API tests driving the router directly with `oneshot` requests.

#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use hydroweb_rust::db::repositories::LocalRepository;
use hydroweb_rust::db::repository::HydroRepository;
use hydroweb_rust::http::{create_router, AppState};
use hydroweb_rust::models::{
    Event, Filter, Location, RecordId, Timeseries, TimeseriesHeader,
};

fn seeded_repository() -> LocalRepository {
    let repo = LocalRepository::new();
    repo.store_location(Location {
        location_id: "A".into(),
        short_name: "Gauge A".into(),
        x: -47.1,
        y: -22.9,
        attributes: Some(serde_json::json!({"river": "Piracicaba"})),
    });
    repo.store_filter(Filter {
        id: "basin".into(),
        name: "Basin stations".into(),
        map_extent: None,
        boundary: None,
    });
    repo.store_timeseries(series(1, "A", "import_obs", "Q.obs", &[1.0, 2.0]));
    repo.store_timeseries(series(2, "A", "model_m1", "Q.sim", &[1.0, 2.0]));
    repo
}

fn series(
    id: RecordId,
    location: &str,
    module: &str,
    parameter: &str,
    values: &[f64],
) -> Timeseries {
    Timeseries {
        id,
        header: TimeseriesHeader {
            module_instance_id: module.into(),
            parameter_id: parameter.into(),
            location_id: location.into(),
            units: None,
        },
        filter_set: vec!["basin".into()],
        threshold_value_sets: Vec::new(),
        events: values
            .iter()
            .enumerate()
            .map(|(i, v)| Event {
                date: format!("2021-06-{:02}", i + 1),
                time: "00:00:00".into(),
                value: *v,
                flag: 0,
            })
            .collect(),
    }
}

fn app(repo: LocalRepository) -> axum::Router {
    let state = AppState::new(Arc::new(repo) as Arc<dyn HydroRepository>);
    create_router(state)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn health_reports_repository_status() {
    let (status, json) = get_json(app(seeded_repository()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["repository"], "connected");
}

#[tokio::test]
async fn locations_listing_hides_attributes_by_default() {
    let (status, json) = get_json(app(seeded_repository()), "/v1/locations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], "1.25");
    assert_eq!(json["geoDatum"], "WGS 1984");
    assert_eq!(json["locations"][0]["locationId"], "A");
    assert!(json["locations"][0].get("attributes").is_none());

    let (_, with_attrs) = get_json(
        app(seeded_repository()),
        "/v1/locations?showAttributes=true",
    )
    .await;
    assert_eq!(
        with_attrs["locations"][0]["attributes"]["river"],
        "Piracicaba"
    );
}

#[tokio::test]
async fn locations_listing_can_include_filters() {
    let (_, json) = get_json(app(seeded_repository()), "/v1/locations?showFilters=true").await;
    assert_eq!(json["locations"][0]["filters"][0]["id"], "basin");
}

#[tokio::test]
async fn filters_listing_is_a_bare_array_without_polygons() {
    let (status, json) = get_json(app(seeded_repository()), "/v1/filters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([{"id": "basin", "name": "Basin stations"}]));

    let (_, with_polygon) = get_json(
        app(seeded_repository()),
        "/v1/filters?includePolygon=true",
    )
    .await;
    assert_eq!(with_polygon["version"], "1.25");
    assert_eq!(with_polygon["locations"][0]["id"], "basin");
}

#[tokio::test]
async fn missing_filter_is_a_404_with_a_message() {
    let (status, json) = get_json(app(seeded_repository()), "/v1/filters/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Filter with id \"ghost\" not found.");
}

#[tokio::test]
async fn timeseries_headers_and_statistics() {
    let (status, json) = get_json(
        app(seeded_repository()),
        "/v1/timeseries?filter=basin&onlyHeaders",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert!(json[0].get("events").is_none());
    assert!(json[0].get("statistics").is_none());

    let (_, with_stats) = get_json(
        app(seeded_repository()),
        "/v1/timeseries?filter=basin&onlyHeaders&showStatistics",
    )
    .await;
    assert_eq!(with_stats[0]["statistics"]["eventCount"], 2);
    assert!(with_stats[0].get("events").is_none());
}

#[tokio::test]
async fn statistics_without_headers_flag_is_rejected() {
    let (status, json) = get_json(
        app(seeded_repository()),
        "/v1/timeseries?filter=basin&showStatistics",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "Unexpected 'show_statistics' with no 'only_headers'."
    );
}

#[tokio::test]
async fn calculate_evaluation_end_to_end() {
    let uri = "/v1/timeseries/calculate?filter=basin&calc=RMSE&simParameterId=Q.sim\
               &obsParameterId=Q.obs&obsModuleInstanceId=import_obs&simModuleInstanceId=model_m1";
    let (status, json) = get_json(app(seeded_repository()), uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], "1.25");
    let entry = &json["evaluation"]["locations"]["A"];
    assert_eq!(entry["obsTimeseriesId"], 1);
    assert_eq!(entry["simTimeseriesId"], 2);
    assert_eq!(entry["value"], 0.0);
}

#[tokio::test]
async fn calculate_classification_failures_are_400s() {
    // Missing simParameterId.
    let (status, json) = get_json(
        app(seeded_repository()),
        "/v1/timeseries/calculate?filter=basin&calc=RMSE",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Missing mandatory argument 'simParameterId'.");

    // Unknown metric, echoed back.
    let uri = "/v1/timeseries/calculate?filter=basin&calc=NSE&simParameterId=Q.sim\
               &obsParameterId=Q.obs&obsModuleInstanceId=import_obs&simModuleInstanceId=model_m1";
    let (status, json) = get_json(app(seeded_repository()), uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Unexpected value for 'calc': 'NSE'.");
}

#[tokio::test]
async fn calculate_storage_failure_is_a_500() {
    let repo = seeded_repository();
    repo.set_healthy(false);
    let uri = "/v1/timeseries/calculate?filter=basin&calc=RMSE&simParameterId=Q.sim\
               &obsParameterId=Q.obs&obsModuleInstanceId=import_obs&simModuleInstanceId=model_m1";
    let (status, json) = get_json(app(repo), uri).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["message"].as_str().unwrap().contains("Connection error"));
}
