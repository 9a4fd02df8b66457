//! Mode classifier: a pure decision table over the optional request fields.
//!
//! Classification runs before any storage access; every error it returns is
//! descriptive and names the offending field or value. The precedence of the
//! guards below is part of the API contract and must stay auditable, so the
//! rules are written as an ordered chain rather than nested conditionals.

use std::fmt;

use crate::services::metrics::Metric;

/// Recognized calculation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcMode {
    /// One observation series versus one simulation series, per location.
    Evaluation,
    /// One observation series versus several simulations, scored
    /// independently per model, per location.
    Competition,
    /// Several simulations scored with a single-sequence metric, no
    /// observation needed.
    Comparison,
    /// Several metrics times several simulations versus one observation, at
    /// one explicit location.
    MatrixEvaluation,
}

impl fmt::Display for CalcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalcMode::Evaluation => "evaluation",
            CalcMode::Competition => "competition",
            CalcMode::Comparison => "comparison",
            CalcMode::MatrixEvaluation => "matrix-evaluation",
        };
        write!(f, "{}", name)
    }
}

/// The recognized calculation options of one request, already split out of
/// the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculationRequest {
    pub filter_id: Option<String>,
    /// Single metric name (per-location modes).
    pub calc: Option<String>,
    /// List of metric names (matrix-evaluation).
    pub calcs: Option<Vec<String>>,
    pub sim_parameter_id: Option<String>,
    pub obs_parameter_id: Option<String>,
    pub obs_module_instance_id: Option<String>,
    pub sim_module_instance_id: Option<String>,
    pub sim_module_instance_ids: Option<Vec<String>>,
    pub location_id: Option<String>,
}

impl CalculationRequest {
    /// The candidate simulation module instances, regardless of whether a
    /// single id or a set was supplied.
    pub fn simulation_candidates(&self) -> Vec<String> {
        if let Some(ids) = &self.sim_module_instance_ids {
            ids.clone()
        } else if let Some(id) = &self.sim_module_instance_id {
            vec![id.clone()]
        } else {
            Vec::new()
        }
    }

    /// Every metric named by the request, resolved against the registry.
    pub fn metrics(&self) -> Result<Vec<Metric>, ClassifyError> {
        let names: Vec<&str> = match (&self.calc, &self.calcs) {
            (Some(name), None) => vec![name.as_str()],
            (None, Some(names)) => names.iter().map(String::as_str).collect(),
            _ => return Err(ClassifyError::ConflictingArguments),
        };
        names
            .into_iter()
            .map(|name| {
                Metric::lookup(name).ok_or_else(|| ClassifyError::UnknownMetric(name.to_string()))
            })
            .collect()
    }

    fn presence(&self) -> FieldPresence {
        FieldPresence {
            obs_parameter_id: self.obs_parameter_id.is_some(),
            obs_module_instance_id: self.obs_module_instance_id.is_some(),
            sim_module_instance_id: self.sim_module_instance_id.is_some(),
            sim_module_instance_ids: self.sim_module_instance_ids.is_some(),
            location_id: self.location_id.is_some(),
            calcs: self.calcs.is_some(),
        }
    }
}

/// Presence/absence of the ambiguous optional fields, echoed back in
/// classification failures for diagnosability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPresence {
    pub obs_parameter_id: bool,
    pub obs_module_instance_id: bool,
    pub sim_module_instance_id: bool,
    pub sim_module_instance_ids: bool,
    pub location_id: bool,
    pub calcs: bool,
}

impl fmt::Display for FieldPresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "obsParameterId={}, obsModuleInstanceId={}, simModuleInstanceId={}, \
             simModuleInstanceIds={}, locationId={}, calcs={}",
            self.obs_parameter_id,
            self.obs_module_instance_id,
            self.sim_module_instance_id,
            self.sim_module_instance_ids,
            self.location_id,
            self.calcs,
        )
    }
}

/// Classification failures, all detected before any storage access.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    #[error("Missing mandatory argument '{0}'.")]
    MissingArgument(&'static str),

    #[error("Exactly one of 'calc' and 'calcs' must be given.")]
    ConflictingArguments,

    #[error("Unexpected value for 'calc': '{0}'.")]
    UnknownMetric(String),

    #[error("Metric '{name}' is not valid for {mode} calculations.")]
    MetricNotSupported { name: String, mode: CalcMode },

    #[error("Unable to define the type of calculation from the set of arguments ({0}).")]
    AmbiguousMode(FieldPresence),
}

/// Decide which calculation mode a request asks for.
///
/// Guard chain, in order of precedence:
/// 1. `filter` and `simParameterId` are mandatory.
/// 2. Exactly one of `calc`/`calcs` must be supplied.
/// 3. Every supplied metric name must be registered.
/// 4. An explicit `locationId` selects matrix-evaluation, which needs an
///    observation module instance and a non-empty simulation set, plus the
///    list form of the metric argument.
/// 5. Otherwise: full observation identifiers with exactly one simulation
///    module instance mean evaluation; the same identifiers with a set mean
///    competition; no observation identifiers with a set of more than one
///    and no single id mean comparison. These three take the single-metric
///    form.
/// 6. Anything else fails with the presence flags echoed back.
pub fn classify(request: &CalculationRequest) -> Result<CalcMode, ClassifyError> {
    if request.filter_id.is_none() {
        return Err(ClassifyError::MissingArgument("filter"));
    }
    if request.sim_parameter_id.is_none() {
        return Err(ClassifyError::MissingArgument("simParameterId"));
    }

    let metrics = request.metrics()?;
    let presence = request.presence();

    let has_obs_ids =
        request.obs_module_instance_id.is_some() && request.obs_parameter_id.is_some();
    let has_single_sim = request.sim_module_instance_id.is_some();
    let sim_set_len = request
        .sim_module_instance_ids
        .as_ref()
        .map(Vec::len)
        .unwrap_or(0);

    let mode = if request.location_id.is_some() {
        if request.obs_module_instance_id.is_some() && sim_set_len > 0 {
            CalcMode::MatrixEvaluation
        } else {
            return Err(ClassifyError::AmbiguousMode(presence));
        }
    } else if has_obs_ids {
        if has_single_sim && request.sim_module_instance_ids.is_none() {
            CalcMode::Evaluation
        } else if !has_single_sim && request.sim_module_instance_ids.is_some() {
            CalcMode::Competition
        } else {
            return Err(ClassifyError::AmbiguousMode(presence));
        }
    } else if request.obs_module_instance_id.is_none()
        && request.obs_parameter_id.is_none()
        && !has_single_sim
        && sim_set_len > 1
    {
        CalcMode::Comparison
    } else {
        return Err(ClassifyError::AmbiguousMode(presence));
    };

    // The metric argument shape must match the mode: matrix-evaluation
    // nests metrics in its output and takes the list form, the per-location
    // modes take a single name.
    let wants_list = mode == CalcMode::MatrixEvaluation;
    if wants_list != request.calcs.is_some() {
        return Err(ClassifyError::AmbiguousMode(presence));
    }

    for metric in &metrics {
        if !metric.supports(mode) {
            return Err(ClassifyError::MetricNotSupported {
                name: metric.name().to_string(),
                mode,
            });
        }
    }

    Ok(mode)
}
