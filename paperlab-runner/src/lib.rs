//! PaperLab Runner — backtest orchestration, metrics, sweeps, artifacts.
//!
//! This crate builds on `paperlab-core` to provide:
//! - Single-run execution from a serializable configuration
//! - Summary and rolling performance metrics
//! - Parallel parameter sweeps with cooperative cancellation
//! - Walk-forward evaluation over disjoint out-of-sample windows
//! - Canonical output artifacts (CSV tables + JSON documents)

pub mod config;
pub mod metrics;
pub mod reporting;
pub mod result;
pub mod rolling;
pub mod runner;
pub mod sweep;
pub mod walk_forward;

pub use config::{RunConfig, RunId, StrategyConfig};
pub use metrics::{MetricsConfig, SummaryStats};
pub use reporting::{ArtifactPaths, ArtifactWriter, RunManifest};
pub use result::{BacktestResult, SCHEMA_VERSION};
pub use rolling::{RollingMetrics, RollingSeries};
pub use runner::{run_from_toml, run_single, RunError};
pub use sweep::{sweep, ParamGrid, SweepResults};
pub use walk_forward::{
    create_folds, run_walk_forward, FoldResult, FoldSpec, WalkForwardConfig, WalkForwardError,
    WalkForwardResult,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn sweep_inputs_and_outputs_cross_threads() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
        assert_send::<BacktestResult>();
        assert_sync::<BacktestResult>();
        assert_send::<SummaryStats>();
        assert_sync::<SummaryStats>();
    }
}
