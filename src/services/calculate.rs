//! Calculation dispatcher: orchestrates one calculation request from header
//! fetch through grouping to metric application.
//!
//! Every mode follows the same pipeline: fetch lightweight headers scoped to
//! the request's filter, group them by location, prune incomplete locations,
//! bulk-fetch the full records of every surviving group in a single round
//! trip, then score each group. The two storage round trips run under a
//! deadline; everything in between is pure computation on data the
//! dispatcher exclusively owns.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use log::debug;

use crate::api::{
    CalculationData, ComparisonEntry, CompetitionEntry, EvaluationEntry, LocationScores,
    MatrixData, ModelScores, PerLocationData,
};
use crate::db::repository::{HydroRepository, RepositoryError};
use crate::models::{RecordId, Timeseries};
use crate::services::classify::{CalcMode, CalculationRequest, ClassifyError};
use crate::services::grouping::{self, GroupingSpec, SimulationIds};
use crate::services::metrics::{Metric, MetricKind};

/// Deadline applied to each storage round trip.
pub const STORAGE_DEADLINE: Duration = Duration::from_secs(30);

/// Failures during calculation execution.
#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("No observation series found for location '{0}'.")]
    MissingObservation(String),
}

/// Execute a classified calculation request.
///
/// Storage failures are fatal for the request; numerically undefined scores
/// are reported as null values per location/model instead.
pub async fn run(
    repo: &dyn HydroRepository,
    mode: CalcMode,
    request: &CalculationRequest,
) -> Result<CalculationData, CalcError> {
    match mode {
        CalcMode::Evaluation => evaluation(repo, request).await,
        CalcMode::Competition => competition(repo, request).await,
        CalcMode::Comparison => comparison(repo, request).await,
        CalcMode::MatrixEvaluation => matrix_evaluation(repo, request).await,
    }
}

async fn evaluation(
    repo: &dyn HydroRepository,
    request: &CalculationRequest,
) -> Result<CalculationData, CalcError> {
    let metric = single_metric(request)?;
    let (grouping, lookup) = fetch_grouped_records(repo, request, true).await?;

    let mut locations = BTreeMap::new();
    for (location_id, entry) in grouping {
        let (Some(obs_id), Some(SimulationIds::Single(sim_id))) =
            (entry.observation, entry.simulation)
        else {
            continue;
        };
        let value = match (lookup.get(&obs_id), lookup.get(&sim_id)) {
            (Some(obs), Some(sim)) => metric.score_pair(&obs.events, &sim.events),
            _ => None,
        };
        locations.insert(
            location_id,
            LocationScores::Evaluation(EvaluationEntry {
                obs_timeseries_id: obs_id,
                sim_timeseries_id: sim_id,
                value,
            }),
        );
    }

    Ok(CalculationData::PerLocation(PerLocationData {
        metric: metric.name().to_string(),
        locations,
    }))
}

async fn competition(
    repo: &dyn HydroRepository,
    request: &CalculationRequest,
) -> Result<CalculationData, CalcError> {
    let metric = single_metric(request)?;
    let (grouping, lookup) = fetch_grouped_records(repo, request, true).await?;

    let mut locations = BTreeMap::new();
    for (location_id, entry) in grouping {
        let (Some(obs_id), Some(simulation)) = (entry.observation, entry.simulation) else {
            continue;
        };
        let by_model = by_model_ids(simulation, &lookup);

        let mut values = ModelScores::new();
        for (model_id, sim_id) in &by_model {
            let value = match (lookup.get(&obs_id), lookup.get(sim_id)) {
                (Some(obs), Some(sim)) => metric.score_pair(&obs.events, &sim.events),
                _ => None,
            };
            values.insert(model_id.clone(), value);
        }

        locations.insert(
            location_id,
            LocationScores::Competition(CompetitionEntry {
                obs_timeseries_id: obs_id,
                sim_timeseries_ids: by_model,
                values,
            }),
        );
    }

    Ok(CalculationData::PerLocation(PerLocationData {
        metric: metric.name().to_string(),
        locations,
    }))
}

async fn comparison(
    repo: &dyn HydroRepository,
    request: &CalculationRequest,
) -> Result<CalculationData, CalcError> {
    let metric = single_metric(request)?;
    let (grouping, lookup) = fetch_grouped_records(repo, request, false).await?;

    let mut locations = BTreeMap::new();
    for (location_id, entry) in grouping {
        let Some(simulation) = entry.simulation else {
            continue;
        };
        let by_model = by_model_ids(simulation, &lookup);

        let mut values = ModelScores::new();
        for (model_id, sim_id) in &by_model {
            let value = lookup
                .get(sim_id)
                .and_then(|sim| metric.score_single(&sim.events));
            values.insert(model_id.clone(), value);
        }

        locations.insert(
            location_id,
            LocationScores::Comparison(ComparisonEntry {
                sim_timeseries_ids: by_model,
                values,
            }),
        );
    }

    Ok(CalculationData::PerLocation(PerLocationData {
        metric: metric.name().to_string(),
        locations,
    }))
}

async fn matrix_evaluation(
    repo: &dyn HydroRepository,
    request: &CalculationRequest,
) -> Result<CalculationData, CalcError> {
    let metrics = request.metrics()?;
    let filter_id = required(&request.filter_id, "filter")?;
    let sim_parameter_id = required(&request.sim_parameter_id, "simParameterId")?;
    let location_id = required(&request.location_id, "locationId")?;
    let obs_module_instance_id = required(&request.obs_module_instance_id, "obsModuleInstanceId")?;

    let mut module_instance_ids = request.simulation_candidates();
    module_instance_ids.push(obs_module_instance_id.to_string());
    let mut parameter_ids = vec![sim_parameter_id.to_string()];
    if let Some(obs_param) = &request.obs_parameter_id {
        parameter_ids.push(obs_param.clone());
    }

    // Pre-filtered and data-full: one storage round trip for everything.
    let records = with_deadline(repo.fetch_headers_by(
        filter_id,
        location_id,
        &module_instance_ids,
        &parameter_ids,
    ))
    .await??;

    // Scan from the end; at most one record is treated as the observation.
    let observation = records
        .iter()
        .rev()
        .find(|ts| ts.header.module_instance_id == obs_module_instance_id)
        .ok_or_else(|| CalcError::MissingObservation(location_id.to_string()))?;

    let mut metrics_out: BTreeMap<String, ModelScores> = BTreeMap::new();
    for metric in metrics {
        let mut by_model = ModelScores::new();
        for model_id in request.simulation_candidates() {
            let simulation = records.iter().find(|ts| {
                ts.id != observation.id
                    && ts.header.module_instance_id == model_id
                    && ts.header.parameter_id == sim_parameter_id
            });
            let value = simulation.and_then(|sim| match metric.kind() {
                MetricKind::Paired => metric.score_pair(&observation.events, &sim.events),
                MetricKind::Single => metric.score_single(&sim.events),
            });
            by_model.insert(model_id, value);
        }
        metrics_out.insert(metric.name().to_string(), by_model);
    }

    Ok(CalculationData::Matrix(MatrixData {
        location_id: location_id.to_string(),
        obs_timeseries_id: observation.id,
        metrics: metrics_out,
    }))
}

/// Run the header fetch, grouping, pruning and bulk record fetch shared by
/// the per-location modes.
async fn fetch_grouped_records(
    repo: &dyn HydroRepository,
    request: &CalculationRequest,
    require_observation: bool,
) -> Result<(grouping::Grouping, HashMap<RecordId, Timeseries>), CalcError> {
    let filter_id = required(&request.filter_id, "filter")?;
    let sim_parameter_id = required(&request.sim_parameter_id, "simParameterId")?;

    let headers = with_deadline(repo.fetch_headers(filter_id)).await??;

    let spec = GroupingSpec {
        obs_parameter_id: request.obs_parameter_id.clone(),
        obs_module_instance_id: request.obs_module_instance_id.clone(),
        sim_parameter_id: sim_parameter_id.to_string(),
        sim_module_instance_ids: request.simulation_candidates(),
    };
    let grouping =
        grouping::prune_incomplete(grouping::group_headers(&headers, &spec), require_observation);
    debug!(
        "Grouped {} headers into {} complete locations for filter '{}'",
        headers.len(),
        grouping.len(),
        filter_id
    );

    // One bulk fetch for every record the surviving groups reference.
    let mut record_ids: Vec<RecordId> = Vec::new();
    for entry in grouping.values() {
        record_ids.extend(entry.observation);
        if let Some(simulation) = &entry.simulation {
            record_ids.extend(simulation.record_ids());
        }
    }
    let records = with_deadline(repo.fetch_records(&record_ids)).await??;
    let lookup: HashMap<RecordId, Timeseries> =
        records.into_iter().map(|ts| (ts.id, ts)).collect();

    Ok((grouping, lookup))
}

/// Model-id→record-id map for one simulation slot. Single-model slots take
/// their model id from the fetched record's header.
fn by_model_ids(
    simulation: SimulationIds,
    lookup: &HashMap<RecordId, Timeseries>,
) -> BTreeMap<String, RecordId> {
    match simulation {
        SimulationIds::ByModel(map) => map,
        SimulationIds::Single(id) => lookup
            .get(&id)
            .map(|ts| {
                let mut map = BTreeMap::new();
                map.insert(ts.header.module_instance_id.clone(), id);
                map
            })
            .unwrap_or_default(),
    }
}

fn single_metric(request: &CalculationRequest) -> Result<Metric, CalcError> {
    let metrics = request.metrics()?;
    metrics
        .into_iter()
        .next()
        .ok_or(CalcError::Classify(ClassifyError::ConflictingArguments))
}

fn required<'a>(
    field: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, ClassifyError> {
    field
        .as_deref()
        .ok_or(ClassifyError::MissingArgument(name))
}

async fn with_deadline<T>(
    fut: impl std::future::Future<Output = T>,
) -> Result<T, RepositoryError> {
    tokio::time::timeout(STORAGE_DEADLINE, fut)
        .await
        .map_err(|_| RepositoryError::TimeoutError("Storage fetch exceeded deadline".to_string()))
}
