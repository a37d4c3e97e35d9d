//! Runs the robot models: the time-stepped launch simulation, trace
//! statistics, and the batch studies built on top of a single evaluation.

pub mod comparison;
pub mod monte_carlo;
pub mod objective;
pub mod pipeline;
pub mod scan;
pub mod simulate;
pub mod stats;

pub use comparison::{compare, ConfigurationStore, Metric, MetricDelta, SavedConfiguration};
pub use monte_carlo::{run_monte_carlo, Distribution1D, MonteCarloSettings, MonteCarloSummary};
pub use objective::{
    evaluate_candidate, Candidate, CandidateScore, Constraints, Goals, Rejection, DEFAULT_BOUNDS,
};
pub use pipeline::{evaluate, Evaluation, RunSettings};
pub use scan::{
    find_param, optimal_range, run_parameter_scan, OptimalValue, ScanMetrics, ScanRow,
    SCANNABLE_PARAMS,
};
pub use simulate::{simulate, simulate_unchecked};
pub use stats::{aggregate, aggregate_with_threshold, StatsSummary, TimeToThreshold, WireGauge};
