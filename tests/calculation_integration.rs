//! End-to-end calculation scenarios against a seeded in-memory repository.

use hydroweb_rust::api::{CalculationData, LocationScores};
use hydroweb_rust::db::repositories::LocalRepository;
use hydroweb_rust::models::{Event, RecordId, Timeseries, TimeseriesHeader};
use hydroweb_rust::services::{
    calculate, classify, CalcMode, CalculationRequest, ClassifyError,
};

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
            units: Some("m3/s".into()),
        },
        filter_set: vec!["basin".into()],
        threshold_value_sets: Vec::new(),
        events: values
            .iter()
            .enumerate()
            .map(|(i, v)| Event {
                date: format!("2021-06-{:02}", i + 1),
                time: "12:00:00".into(),
                value: *v,
                flag: 0,
            })
            .collect(),
    }
}

fn base_request() -> CalculationRequest {
    CalculationRequest {
        filter_id: Some("basin".into()),
        sim_parameter_id: Some("Q.sim".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn evaluation_scores_only_complete_locations() {
    // Location A has both roles; location B only an observation.
    let repo = LocalRepository::new();
    repo.store_timeseries(series(1, "A", "import_obs", "Q.obs", &[1.0, 2.0, 3.0]));
    repo.store_timeseries(series(2, "A", "forecast_m1", "Q.sim", &[1.0, 2.0, 3.0]));
    repo.store_timeseries(series(3, "B", "import_obs", "Q.obs", &[4.0, 5.0]));

    let request = CalculationRequest {
        calc: Some("RMSE".into()),
        obs_parameter_id: Some("Q.obs".into()),
        obs_module_instance_id: Some("import_obs".into()),
        sim_module_instance_id: Some("forecast_m1".into()),
        ..base_request()
    };
    let mode = classify::classify(&request).unwrap();
    assert_eq!(mode, CalcMode::Evaluation);

    let data = calculate::run(&repo, mode, &request).await.unwrap();
    let CalculationData::PerLocation(result) = data else {
        panic!("expected per-location result");
    };
    assert_eq!(result.metric, "RMSE");
    assert_eq!(result.locations.len(), 1);
    let LocationScores::Evaluation(entry) = &result.locations["A"] else {
        panic!("expected evaluation entry");
    };
    assert_eq!(entry.obs_timeseries_id, 1);
    assert_eq!(entry.sim_timeseries_id, 2);
    // Identical values on identical timestamps score a perfect 0.000.
    assert_eq!(entry.value, Some(0.0));
}

#[tokio::test]
async fn competition_scores_each_model_independently() {
    let repo = LocalRepository::new();
    repo.store_timeseries(series(1, "A", "import_obs", "Q.obs", &[2.0, 4.0, 6.0]));
    repo.store_timeseries(series(2, "A", "model_m1", "Q.sim", &[2.0, 4.0, 6.0]));
    repo.store_timeseries(series(3, "A", "model_m2", "Q.sim", &[3.0, 5.0, 7.0]));

    let request = CalculationRequest {
        calc: Some("RMSE".into()),
        obs_parameter_id: Some("Q.obs".into()),
        obs_module_instance_id: Some("import_obs".into()),
        sim_module_instance_ids: Some(vec!["model_m1".into(), "model_m2".into()]),
        ..base_request()
    };
    let mode = classify::classify(&request).unwrap();
    assert_eq!(mode, CalcMode::Competition);

    let data = calculate::run(&repo, mode, &request).await.unwrap();
    let CalculationData::PerLocation(result) = data else {
        panic!("expected per-location result");
    };
    let LocationScores::Competition(entry) = &result.locations["A"] else {
        panic!("expected competition entry");
    };
    assert_eq!(entry.obs_timeseries_id, 1);
    assert_eq!(entry.sim_timeseries_ids["model_m1"], 2);
    assert_eq!(entry.sim_timeseries_ids["model_m2"], 3);
    assert_eq!(entry.values["model_m1"], Some(0.0));
    assert_eq!(entry.values["model_m2"], Some(1.0));
}

#[tokio::test]
async fn comparison_peaks_need_no_observation() {
    // Three simulation series across two locations.
    let repo = LocalRepository::new();
    repo.store_timeseries(series(1, "A", "model_m1", "Q.sim", &[1.0, 7.5, 3.0]));
    repo.store_timeseries(series(2, "A", "model_m2", "Q.sim", &[4.0, 2.0]));
    repo.store_timeseries(series(3, "B", "model_m1", "Q.sim", &[0.5, 0.25]));

    let request = CalculationRequest {
        calc: Some("PEAK".into()),
        sim_module_instance_ids: Some(vec!["model_m1".into(), "model_m2".into()]),
        ..base_request()
    };
    let mode = classify::classify(&request).unwrap();
    assert_eq!(mode, CalcMode::Comparison);

    let data = calculate::run(&repo, mode, &request).await.unwrap();
    let CalculationData::PerLocation(result) = data else {
        panic!("expected per-location result");
    };
    assert_eq!(result.locations.len(), 2);

    let LocationScores::Comparison(a) = &result.locations["A"] else {
        panic!("expected comparison entry");
    };
    assert_eq!(a.values["model_m1"], Some(7.5));
    assert_eq!(a.values["model_m2"], Some(4.0));

    let LocationScores::Comparison(b) = &result.locations["B"] else {
        panic!("expected comparison entry");
    };
    assert_eq!(b.values["model_m1"], Some(0.5));
    assert!(!b.values.contains_key("model_m2"));
}

#[tokio::test]
async fn unknown_metric_in_matrix_request_fails_before_any_fetch() {
    // The repository is unhealthy: any storage access would error, so a
    // classification failure proves nothing was fetched.
    let repo = LocalRepository::new();
    repo.set_healthy(false);

    let request = CalculationRequest {
        calcs: Some(vec!["RMSE".into(), "peak-invalid".into()]),
        obs_module_instance_id: Some("import_obs".into()),
        sim_module_instance_ids: Some(vec!["model_m1".into(), "model_m2".into()]),
        location_id: Some("A".into()),
        ..base_request()
    };
    let err = classify::classify(&request).unwrap_err();
    assert_eq!(err, ClassifyError::UnknownMetric("peak-invalid".into()));
}

#[tokio::test]
async fn numeric_undefined_scores_do_not_block_other_locations() {
    let repo = LocalRepository::new();
    // A aligns; B's observation shares no timestamps with its simulation.
    repo.store_timeseries(series(1, "A", "import_obs", "Q.obs", &[1.0, 2.0]));
    repo.store_timeseries(series(2, "A", "model_m1", "Q.sim", &[1.5, 2.5]));
    let mut disjoint_obs = series(3, "B", "import_obs", "Q.obs", &[1.0]);
    disjoint_obs.events[0].date = "1999-01-01".into();
    repo.store_timeseries(disjoint_obs);
    repo.store_timeseries(series(4, "B", "model_m1", "Q.sim", &[1.0]));

    let request = CalculationRequest {
        calc: Some("RMSE".into()),
        obs_parameter_id: Some("Q.obs".into()),
        obs_module_instance_id: Some("import_obs".into()),
        sim_module_instance_id: Some("model_m1".into()),
        ..base_request()
    };
    let data = calculate::run(&repo, CalcMode::Evaluation, &request)
        .await
        .unwrap();
    let CalculationData::PerLocation(result) = data else {
        panic!("expected per-location result");
    };
    let LocationScores::Evaluation(a) = &result.locations["A"] else {
        panic!("expected evaluation entry");
    };
    assert_eq!(a.value, Some(0.5));
    let LocationScores::Evaluation(b) = &result.locations["B"] else {
        panic!("expected evaluation entry");
    };
    assert_eq!(b.value, None);
}

#[tokio::test]
async fn matrix_evaluation_builds_a_metric_by_model_matrix() {
    let repo = LocalRepository::new();
    repo.store_timeseries(series(1, "A", "import_obs", "Q.obs", &[1.0, 2.0, 3.0]));
    repo.store_timeseries(series(2, "A", "model_m1", "Q.sim", &[1.0, 2.0, 3.0]));
    repo.store_timeseries(series(3, "A", "model_m2", "Q.sim", &[2.0, 3.0, 4.0]));

    let request = CalculationRequest {
        calcs: Some(vec!["RMSE".into(), "PEAK".into()]),
        obs_parameter_id: Some("Q.obs".into()),
        obs_module_instance_id: Some("import_obs".into()),
        sim_module_instance_ids: Some(vec!["model_m1".into(), "model_m2".into()]),
        location_id: Some("A".into()),
        ..base_request()
    };
    let mode = classify::classify(&request).unwrap();
    assert_eq!(mode, CalcMode::MatrixEvaluation);

    let data = calculate::run(&repo, mode, &request).await.unwrap();
    let CalculationData::Matrix(matrix) = data else {
        panic!("expected matrix result");
    };
    assert_eq!(matrix.location_id, "A");
    assert_eq!(matrix.obs_timeseries_id, 1);
    assert_eq!(matrix.metrics["RMSE"]["model_m1"], Some(0.0));
    assert_eq!(matrix.metrics["RMSE"]["model_m2"], Some(1.0));
    assert_eq!(matrix.metrics["PEAK"]["model_m1"], Some(3.0));
    assert_eq!(matrix.metrics["PEAK"]["model_m2"], Some(4.0));
}
