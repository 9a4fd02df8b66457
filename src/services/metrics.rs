//! Metric library: named numeric functions scoring one or two event
//! sequences.
//!
//! Every metric rounds its output to a fixed 3-decimal precision as the
//! final step; callers rely on that normalization for display and testing.
//! Metrics return `None` instead of erroring when the input is numerically
//! degenerate (empty alignment intersection, empty series, zero means or
//! variances in KGE), so one bad pairing never aborts a whole calculation.

use crate::models::Event;
use crate::services::alignment;
use crate::services::classify::CalcMode;

/// Which call shape a metric takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Two aligned sequences: observation versus simulation.
    Paired,
    /// A single simulation sequence.
    Single,
}

/// A registered comparison metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Rmse,
    Kge,
    Mean,
    Peak,
}

impl Metric {
    /// The full registry, fixed at compile time.
    pub const ALL: [Metric; 4] = [Metric::Rmse, Metric::Kge, Metric::Mean, Metric::Peak];

    /// Canonical registered name.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Rmse => "RMSE",
            Metric::Kge => "KGE",
            Metric::Mean => "MEAN",
            Metric::Peak => "PEAK",
        }
    }

    /// Look a metric up by its registered name (case-insensitive).
    pub fn lookup(name: &str) -> Option<Metric> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Rmse | Metric::Kge => MetricKind::Paired,
            Metric::Mean | Metric::Peak => MetricKind::Single,
        }
    }

    /// The calculation modes this metric is eligible for.
    ///
    /// Paired metrics need an observation to score against; single-sequence
    /// metrics score each simulation on its own. Matrix-evaluation accepts
    /// both shapes and picks the call form from [`Metric::kind`].
    pub fn supports(&self, mode: CalcMode) -> bool {
        match self.kind() {
            MetricKind::Paired => matches!(
                mode,
                CalcMode::Evaluation | CalcMode::Competition | CalcMode::MatrixEvaluation
            ),
            MetricKind::Single => {
                matches!(mode, CalcMode::Comparison | CalcMode::MatrixEvaluation)
            }
        }
    }

    /// Score an observation/simulation record pairing: align on the shared
    /// `"date time"` keys, then apply the paired function.
    ///
    /// Returns `None` for single-sequence metrics and for empty
    /// intersections.
    pub fn score_pair(&self, obs_events: &[Event], sim_events: &[Event]) -> Option<f64> {
        let (obs, sim) = alignment::align(obs_events, sim_events);
        match self {
            Metric::Rmse => rmse(&obs, &sim),
            Metric::Kge => kge(&obs, &sim),
            Metric::Mean | Metric::Peak => None,
        }
    }

    /// Score a single simulation sequence over all of its events.
    ///
    /// Returns `None` for paired metrics and for empty sequences.
    pub fn score_single(&self, sim_events: &[Event]) -> Option<f64> {
        let values: Vec<f64> = sim_events.iter().map(|e| e.value).collect();
        match self {
            Metric::Mean => mean(&values),
            Metric::Peak => peak(&values),
            Metric::Rmse | Metric::Kge => None,
        }
    }
}

/// Quantize to exactly 3 decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Root mean square error over two aligned sequences.
pub fn rmse(obs: &[f64], sim: &[f64]) -> Option<f64> {
    if obs.is_empty() || obs.len() != sim.len() {
        return None;
    }
    let n = obs.len() as f64;
    let sum_sq: f64 = obs
        .iter()
        .zip(sim.iter())
        .map(|(o, s)| (o - s).powi(2))
        .sum();
    Some(round3((sum_sq / n).sqrt()))
}

/// Kling-Gupta efficiency over two aligned sequences.
///
/// `1 - sqrt((r-1)^2 + (a-1)^2 + (b-1)^2)` where `r` is the Pearson
/// correlation, `a` the ratio of coefficients of variation and `b` the bias
/// ratio. Degenerate statistics (zero mean of either series, zero variance
/// of either series) make the score undefined and yield `None`.
pub fn kge(obs: &[f64], sim: &[f64]) -> Option<f64> {
    if obs.is_empty() || obs.len() != sim.len() {
        return None;
    }
    let n = obs.len() as f64;
    let mean_obs = obs.iter().sum::<f64>() / n;
    let mean_sim = sim.iter().sum::<f64>() / n;
    if mean_obs == 0.0 || mean_sim == 0.0 {
        return None;
    }

    let std_obs = std_dev(obs, mean_obs);
    let std_sim = std_dev(sim, mean_sim);
    let r = pearson(obs, sim)?;

    let cv_obs = std_obs / mean_obs;
    if cv_obs == 0.0 {
        return None;
    }
    let a = (std_sim / mean_sim) / cv_obs;
    let b = mean_sim / mean_obs;

    let distance = ((r - 1.0).powi(2) + (a - 1.0).powi(2) + (b - 1.0).powi(2)).sqrt();
    Some(round3(1.0 - distance))
}

/// Pearson correlation coefficient; `None` when either series has zero
/// variance.
pub fn pearson(obs: &[f64], sim: &[f64]) -> Option<f64> {
    if obs.is_empty() || obs.len() != sim.len() {
        return None;
    }
    let n = obs.len() as f64;
    let mean_obs = obs.iter().sum::<f64>() / n;
    let mean_sim = sim.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_obs = 0.0;
    let mut var_sim = 0.0;
    for (o, s) in obs.iter().zip(sim.iter()) {
        let d_obs = o - mean_obs;
        let d_sim = s - mean_sim;
        cov += d_obs * d_sim;
        var_obs += d_obs * d_obs;
        var_sim += d_sim * d_sim;
    }
    if var_obs == 0.0 || var_sim == 0.0 {
        return None;
    }
    Some(cov / (var_obs.sqrt() * var_sim.sqrt()))
}

/// Arithmetic mean of a sequence; `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(round3(values.iter().sum::<f64>() / values.len() as f64))
}

/// Maximum value of a sequence; `None` when empty.
pub fn peak(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |a| a.max(v)))
        })
        .map(round3)
}

/// Population standard deviation around a precomputed mean.
fn std_dev(values: &[f64], mean: f64) -> f64 {
    let n = values.len() as f64;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}
