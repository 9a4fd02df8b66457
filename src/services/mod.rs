//! Business logic: the calculation engine and listing helpers.
//!
//! The calculation path runs classify → group → align → score:
//! [`classify`] decides the mode from the request's optional fields,
//! [`grouping`] assigns per-location roles to the fetched headers,
//! [`alignment`] intersects event sequences on their timestamps, and
//! [`metrics`] holds the scoring functions. [`calculate`] orchestrates the
//! whole pipeline against a repository.

pub mod alignment;
pub mod calculate;
pub mod classify;
pub mod grouping;
pub mod locations;
pub mod metrics;
pub mod thresholds;

pub use calculate::{run as run_calculation, CalcError};
pub use classify::{classify, CalcMode, CalculationRequest, ClassifyError};
pub use metrics::{Metric, MetricKind};
